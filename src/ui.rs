use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    session::{CharClass, Session},
    App,
};

pub const HEADER: &str = "Let's test your typing skills";
pub const RESET_LABEL: &str = "Reset";
const LEGEND: &str = "(tab) reset / (esc)ape";
const NBSP: char = '\u{00A0}';

const HORIZONTAL_MARGIN: u16 = 5;
const BUTTON_WIDTH: u16 = 11;
const BUTTON_HEIGHT: u16 = 3;

pub fn wpm_label(wpm: u32) -> String {
    format!("Typing speed (in WPM): {}", wpm)
}

pub fn timer_label(elapsed_secs: f64) -> String {
    format!("Timer: {:.1}s", elapsed_secs)
}

pub fn accuracy_label(accuracy: u32) -> String {
    format!("Accuracy: {}%", accuracy)
}

pub fn metrics_line(session: &Session) -> String {
    format!(
        "{} | {} | {}",
        wpm_label(session.wpm()),
        timer_label(session.elapsed_secs()),
        accuracy_label(session.accuracy())
    )
}

/// Where each part of the screen goes for a given sentence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub metrics: Rect,
    pub sentence: Rect,
    pub button: Rect,
    pub legend: Rect,
}

pub fn screen_layout(target: &str, area: Rect) -> ScreenLayout {
    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let sentence_lines = if target.width() <= max_chars_per_line as usize {
        1
    } else {
        ((target.width() as f64 / max_chars_per_line as f64).ceil() + 1.0) as u16
    };

    // header, gap, metrics, gap, sentence, gap, button, legend
    let content_height = sentence_lines.saturating_add(BUTTON_HEIGHT + 6);
    let top = area.height.saturating_sub(content_height) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(top),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(sentence_lines),
                Constraint::Length(1),
                Constraint::Length(BUTTON_HEIGHT),
                Constraint::Length(1),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let button_row = chunks[7];
    let button_width = BUTTON_WIDTH.min(button_row.width);
    let button = Rect::new(
        button_row.x + (button_row.width - button_width) / 2,
        button_row.y,
        button_width,
        button_row.height,
    );

    ScreenLayout {
        header: chunks[1],
        metrics: chunks[3],
        sentence: chunks[5],
        button,
        legend: chunks[8],
    }
}

/// Hit box of the Reset button for the current screen size.
pub fn reset_button_area(target: &str, area: Rect) -> Rect {
    screen_layout(target, area).button
}

fn sentence_spans(session: &Session) -> Vec<Span<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
    let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
    let dim_bold_style = Style::default()
        .patch(bold_style)
        .add_modifier(Modifier::DIM);
    let underlined_dim_bold_style = Style::default()
        .patch(dim_bold_style)
        .add_modifier(Modifier::UNDERLINED);

    let cursor = session.cursor();

    session
        .char_classes()
        .into_iter()
        .enumerate()
        .map(|(idx, (expected, class))| {
            let style = match class {
                CharClass::Correct => green_bold_style,
                // a red nbsp is invisible, so wrong spaces get a background
                CharClass::Incorrect if expected == ' ' => red_bold_style.bg(Color::Red),
                CharClass::Incorrect => red_bold_style,
                CharClass::Untyped if idx == cursor && !session.is_complete() => {
                    underlined_dim_bold_style
                }
                CharClass::Untyped => dim_bold_style,
            };

            let glyph = if expected == ' ' { NBSP } else { expected };
            Span::styled(glyph.to_string(), style)
        })
        .collect()
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        let layout = screen_layout(session.target(), area);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        Paragraph::new(Span::styled(HEADER, bold_style.fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(layout.header, buf);

        Paragraph::new(Span::styled(metrics_line(session), bold_style))
            .alignment(Alignment::Center)
            .render(layout.metrics, buf);

        let single_line = session.target().width() <= layout.sentence.width as usize;
        Paragraph::new(Line::from(sentence_spans(session)))
            .alignment(if single_line {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(layout.sentence, buf);

        let button_style = if session.is_complete() {
            bold_style.fg(Color::Yellow)
        } else {
            bold_style
        };
        Paragraph::new(Span::styled(RESET_LABEL, button_style))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .render(layout.button, buf);

        Paragraph::new(Span::styled(LEGEND, italic_style))
            .alignment(Alignment::Center)
            .render(layout.legend, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentences::SentenceSource;
    use crate::session::Keystroke;
    use std::time::{Duration, Instant};

    const FOX: &str = "The quick brown fox jumps over the lazy dog.";

    fn create_test_app(prompt: &str) -> App {
        App::new(SentenceSource::List(vec![prompt.to_string()]))
    }

    fn render_lines(app: &App, area: Rect) -> Vec<String> {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);

        (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buffer[(area.x + x, area.y + y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn rendered(app: &App, area: Rect) -> String {
        render_lines(app, area).join("\n")
    }

    #[test]
    fn labels_match_text_contract() {
        assert_eq!(wpm_label(0), "Typing speed (in WPM): 0");
        assert_eq!(timer_label(0.0), "Timer: 0.0s");
        assert_eq!(timer_label(12.345), "Timer: 12.3s");
        assert_eq!(accuracy_label(100), "Accuracy: 100%");
    }

    #[test]
    fn idle_screen_shows_header_metrics_and_button() {
        let app = create_test_app(FOX);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(text.contains(HEADER));
        assert!(text.contains("Typing speed (in WPM): 0 | Timer: 0.0s | Accuracy: 100%"));
        assert!(text.contains(RESET_LABEL));
        assert!(text.contains(LEGEND));
    }

    #[test]
    fn sentence_spaces_render_as_nbsp() {
        let app = create_test_app(FOX);
        let text = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(text.contains("The\u{a0}quick\u{a0}brown"));
    }

    #[test]
    fn spans_classify_typed_chars() {
        let mut app = create_test_app("ab c");
        app.session.apply(Keystroke::Char('a'));
        app.session.apply(Keystroke::Char('x'));

        let spans = sentence_spans(&app.session);

        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].style.fg, Some(Color::Green));
        assert_eq!(spans[1].style.fg, Some(Color::Red));
        assert!(spans[2].style.add_modifier.contains(Modifier::UNDERLINED));
        assert_eq!(spans[2].content, "\u{a0}");
        assert!(spans[3].style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn wrong_space_gets_background() {
        let mut app = create_test_app("a b");
        app.session.apply(Keystroke::Char('a'));
        app.session.apply(Keystroke::Char('x'));

        let spans = sentence_spans(&app.session);
        assert_eq!(spans[1].style.bg, Some(Color::Red));
    }

    #[test]
    fn completed_screen_shows_final_metrics() {
        let mut app = create_test_app("ab cd");
        let start = Instant::now();
        app.session.apply_at(Keystroke::Char('a'), start);
        for c in "b cd".chars() {
            app.session
                .apply_at(Keystroke::Char(c), start + Duration::from_secs(30));
        }

        let text = rendered(&app, Rect::new(0, 0, 80, 24));

        assert!(text.contains("Typing speed (in WPM): 4 | Timer: 30.0s | Accuracy: 100%"));
    }

    #[test]
    fn button_is_centered_below_sentence() {
        let area = Rect::new(0, 0, 80, 24);
        let layout = screen_layout(FOX, area);

        assert_eq!(layout.button.width, BUTTON_WIDTH);
        assert_eq!(layout.button.height, BUTTON_HEIGHT);
        assert!(layout.button.y > layout.sentence.y);
        assert_eq!(layout.button.x, (80 - BUTTON_WIDTH) / 2);
        assert_eq!(reset_button_area(FOX, area), layout.button);
    }

    #[test]
    fn long_sentence_takes_several_lines() {
        let long = "word ".repeat(40);
        let layout = screen_layout(long.trim_end(), Rect::new(0, 0, 40, 30));

        assert!(layout.sentence.height > 1);
    }

    #[test]
    fn huge_sentence_in_narrow_area_does_not_overflow() {
        let huge = "x".repeat(70_000);
        let layout = screen_layout(&huge, Rect::new(0, 0, 11, 24));

        assert!(layout.sentence.height <= 24);
        assert!(layout.button.y <= 24);
    }

    #[test]
    fn renders_into_tiny_and_huge_areas() {
        let app = create_test_app(FOX);

        for area in [
            Rect::new(0, 0, 5, 3),
            Rect::new(0, 0, 20, 5),
            Rect::new(0, 0, 300, 100),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert_eq!(*buffer.area(), area);
        }
    }

    #[test]
    fn renders_through_test_backend() {
        use ratatui::{backend::TestBackend, Terminal};

        let app = create_test_app(FOX);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains(HEADER));
    }
}
