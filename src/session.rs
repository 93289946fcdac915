use std::time::{Duration, Instant};

use crate::scoring;

/// Accuracy shown before anything has been typed
pub const INITIAL_ACCURACY: u32 = 100;

/// A single edit to the typed text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    Backspace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Typing,
    Complete,
}

/// How a character of the target renders against the typed text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Untyped,
    Correct,
    Incorrect,
}

/// One attempt at reproducing a target sentence
#[derive(Debug, Clone)]
pub struct Session {
    target: String,
    target_len: usize,
    typed: String,
    started_at: Option<Instant>,
    completed: bool,
    wpm: u32,
    accuracy: u32,
    elapsed_secs: f64,
}

impl Session {
    pub fn new(target: String) -> Self {
        let target_len = target.chars().count();
        Self {
            target,
            target_len,
            typed: String::new(),
            started_at: None,
            completed: false,
            wpm: 0,
            accuracy: INITIAL_ACCURACY,
            elapsed_secs: 0.0,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn phase(&self) -> Phase {
        match (self.started_at, self.completed) {
            (_, true) => Phase::Complete,
            (Some(_), false) => Phase::Typing,
            (None, false) => Phase::Idle,
        }
    }

    /// Whether the elapsed-time display should keep refreshing.
    pub fn is_ticking(&self) -> bool {
        self.phase() == Phase::Typing
    }

    /// Index of the next character to type, in chars.
    pub fn cursor(&self) -> usize {
        self.typed.chars().count()
    }

    pub fn apply(&mut self, keystroke: Keystroke) -> bool {
        self.apply_at(keystroke, Instant::now())
    }

    /// Feed one keystroke observed at `now`.
    ///
    /// Returns false when the keystroke had no effect: the session is
    /// complete, or Backspace was pressed with nothing typed.
    pub fn apply_at(&mut self, keystroke: Keystroke, now: Instant) -> bool {
        if self.completed {
            return false;
        }

        match keystroke {
            Keystroke::Backspace => {
                if self.typed.pop().is_none() {
                    return false;
                }
            }
            Keystroke::Char(c) => {
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.typed.push(c);
            }
        }

        if self.cursor() == self.target_len {
            self.complete_at(now);
        }

        self.accuracy = scoring::accuracy(&self.target, &self.typed);
        true
    }

    fn complete_at(&mut self, now: Instant) {
        let elapsed = self.elapsed_until(now);
        let matched = scoring::matched_words(&self.target, &self.typed);

        self.wpm = scoring::words_per_minute(matched, elapsed);
        self.elapsed_secs = elapsed.as_secs_f64();
        self.completed = true;
    }

    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now())
    }

    /// Refresh the elapsed time while typing; a no-op in any other phase.
    pub fn on_tick_at(&mut self, now: Instant) {
        if self.is_ticking() {
            self.elapsed_secs = self.elapsed_until(now).as_secs_f64();
        }
    }

    fn elapsed_until(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Pair every target character with its render class.
    pub fn char_classes(&self) -> Vec<(char, CharClass)> {
        let mut typed = self.typed.chars();

        self.target
            .chars()
            .map(|expected| {
                let class = match typed.next() {
                    None => CharClass::Untyped,
                    Some(actual) if actual == expected => CharClass::Correct,
                    Some(_) => CharClass::Incorrect,
                };
                (expected, class)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "The quick brown fox jumps over the lazy dog.";

    fn type_str(session: &mut Session, text: &str, now: Instant) {
        for c in text.chars() {
            session.apply_at(Keystroke::Char(c), now);
        }
    }

    #[test]
    fn new_session_is_idle_with_zeroed_metrics() {
        let session = Session::new(FOX.to_string());

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.typed(), "");
        assert_eq!(session.started_at(), None);
        assert_eq!(session.wpm(), 0);
        assert_eq!(session.accuracy(), 100);
        assert_eq!(session.elapsed_secs(), 0.0);
        assert!(!session.is_ticking());
    }

    #[test]
    fn first_char_starts_the_clock() {
        let mut session = Session::new(FOX.to_string());
        let now = Instant::now();

        assert!(session.apply_at(Keystroke::Char('T'), now));

        assert_eq!(session.phase(), Phase::Typing);
        assert_eq!(session.started_at(), Some(now));
        assert!(session.is_ticking());
    }

    #[test]
    fn start_instant_is_set_once() {
        let mut session = Session::new(FOX.to_string());
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(2);
        let t2 = t0 + Duration::from_secs(4);

        session.apply_at(Keystroke::Char('T'), t0);
        session.apply_at(Keystroke::Backspace, t1);
        assert_eq!(session.typed(), "");
        assert_eq!(session.phase(), Phase::Typing);

        session.apply_at(Keystroke::Char('T'), t2);
        assert_eq!(session.started_at(), Some(t0));
    }

    #[test]
    fn backspace_removes_one_trailing_char() {
        let mut session = Session::new(FOX.to_string());
        let now = Instant::now();
        type_str(&mut session, "The q", now);

        assert!(session.apply_at(Keystroke::Backspace, now + Duration::from_secs(1)));

        assert_eq!(session.typed(), "The ");
        assert_eq!(session.started_at(), Some(now));
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut session = Session::new(FOX.to_string());

        assert!(!session.apply_at(Keystroke::Backspace, Instant::now()));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.accuracy(), 100);
    }

    #[test]
    fn accuracy_recomputed_after_every_keystroke() {
        let mut session = Session::new(FOX.to_string());
        let now = Instant::now();

        type_str(&mut session, "Teh ", now);
        assert_eq!(session.accuracy(), 0);

        for _ in 0..4 {
            session.apply_at(Keystroke::Backspace, now);
        }
        type_str(&mut session, "The ", now);
        assert_eq!(session.accuracy(), 11);
    }

    #[test]
    fn typing_whole_sentence_completes() {
        let mut session = Session::new(FOX.to_string());
        let start = Instant::now();

        let mut chars = FOX.chars();
        session.apply_at(Keystroke::Char(chars.next().unwrap()), start);
        for c in chars {
            session.apply_at(Keystroke::Char(c), start + Duration::from_secs(15));
        }

        assert!(session.is_complete());
        assert_eq!(session.phase(), Phase::Complete);
        assert_eq!(session.accuracy(), 100);
        assert_eq!(session.wpm(), 36);
        assert_eq!(session.elapsed_secs(), 15.0);
        assert!(!session.is_ticking());
    }

    #[test]
    fn completed_session_ignores_input() {
        let mut session = Session::new("hi".to_string());
        let now = Instant::now();
        type_str(&mut session, "hi", now);
        assert!(session.is_complete());

        assert!(!session.apply_at(Keystroke::Char('x'), now));
        assert!(!session.apply_at(Keystroke::Backspace, now));
        assert_eq!(session.typed(), "hi");
    }

    #[test]
    fn completion_with_mistakes_scores_partially() {
        let mut session = Session::new("ab cd".to_string());
        let start = Instant::now();
        session.apply_at(Keystroke::Char('a'), start);
        type_str(&mut session, "b cx", start + Duration::from_secs(30));

        assert!(session.is_complete());
        assert_eq!(session.accuracy(), 50);
        // one matched word in half a minute
        assert_eq!(session.wpm(), 2);
    }

    #[test]
    fn single_char_target_completes_without_dividing_by_zero() {
        let mut session = Session::new("a".to_string());

        session.apply_at(Keystroke::Char('a'), Instant::now());

        assert!(session.is_complete());
        assert_eq!(session.wpm(), 0);
        assert_eq!(session.accuracy(), 100);
    }

    #[test]
    fn typed_never_outgrows_target() {
        let mut session = Session::new("abc".to_string());
        type_str(&mut session, "abcdef", Instant::now());

        assert_eq!(session.typed(), "abc");
        assert_eq!(session.cursor(), 3);
    }

    #[test]
    fn tick_updates_elapsed_only_while_typing() {
        let mut session = Session::new(FOX.to_string());
        let start = Instant::now();

        session.on_tick_at(start + Duration::from_secs(5));
        assert_eq!(session.elapsed_secs(), 0.0);

        session.apply_at(Keystroke::Char('T'), start);
        session.on_tick_at(start + Duration::from_millis(2500));
        assert_eq!(session.elapsed_secs(), 2.5);
    }

    #[test]
    fn tick_after_completion_keeps_final_time() {
        let mut session = Session::new("ok".to_string());
        let start = Instant::now();
        session.apply_at(Keystroke::Char('o'), start);
        session.apply_at(Keystroke::Char('k'), start + Duration::from_secs(3));

        session.on_tick_at(start + Duration::from_secs(10));

        assert_eq!(session.elapsed_secs(), 3.0);
    }

    #[test]
    fn multibyte_targets_complete_by_char_count() {
        let mut session = Session::new("café".to_string());
        type_str(&mut session, "café", Instant::now());

        assert!(session.is_complete());
        assert_eq!(session.accuracy(), 100);
    }

    #[test]
    fn char_classes_mark_correct_incorrect_and_untyped() {
        let mut session = Session::new("ab c".to_string());
        type_str(&mut session, "ax", Instant::now());

        assert_eq!(
            session.char_classes(),
            vec![
                ('a', CharClass::Correct),
                ('b', CharClass::Incorrect),
                (' ', CharClass::Untyped),
                ('c', CharClass::Untyped),
            ]
        );
    }

    #[test]
    fn char_classes_compare_spaces() {
        let mut session = Session::new("a b".to_string());
        type_str(&mut session, "a_", Instant::now());

        assert_eq!(session.char_classes()[1], (' ', CharClass::Incorrect));

        session.apply_at(Keystroke::Backspace, Instant::now());
        session.apply_at(Keystroke::Char(' '), Instant::now());
        assert_eq!(session.char_classes()[1], (' ', CharClass::Correct));
    }
}
