use itertools::{EitherOrBoth, Itertools};
use std::time::Duration;

/// Number of target words reproduced exactly at the same position.
///
/// Both texts are split on single spaces, so doubled spaces yield empty
/// words that must be matched too. Typed words past the end of the target
/// and target words not yet typed never match.
pub fn matched_words(target: &str, typed: &str) -> usize {
    target
        .split(' ')
        .zip_longest(typed.split(' '))
        .filter(|pair| matches!(pair, EitherOrBoth::Both(expected, actual) if expected == actual))
        .count()
}

/// Percentage of target words matched, rounded to the nearest integer.
///
/// Words that have not been typed yet count against the score, so a
/// half-typed sentence can never reach 100.
pub fn accuracy(target: &str, typed: &str) -> u32 {
    let total = target.split(' ').count();
    let matched = matched_words(target, typed);

    ((matched as f64 / total as f64) * 100.0).round() as u32
}

/// Matched words per elapsed minute, rounded.
///
/// Returns 0 when no measurable time has passed rather than dividing by zero.
pub fn words_per_minute(matched: usize, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }

    let wpm = (matched as f64 / minutes).round();
    if wpm.is_finite() {
        wpm as u32
    } else {
        0
    }
}
