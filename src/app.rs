use crossterm::event::KeyEvent;
use log::{debug, info};
use ratatui::layout::{Position, Rect};

use crate::listener::{self, Command, KeyAction};
use crate::runtime::AppEvent;
use crate::sentences::SentenceSource;
use crate::session::{Keystroke, Session};
use crate::ui;

#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub source: SentenceSource,
    pub should_quit: bool,
}

impl App {
    pub fn new(source: SentenceSource) -> Self {
        let session = Session::new(source.next_sentence());
        debug!("new session: {:?}", session.target());

        Self {
            session,
            source,
            should_quit: false,
        }
    }

    /// Start over with a freshly picked sentence.
    pub fn reset(&mut self) {
        self.session = Session::new(self.source.next_sentence());
        debug!("reset, new session: {:?}", self.session.target());
    }

    pub fn run_command(&mut self, command: Command) {
        match command {
            Command::Reset => self.reset(),
            Command::Quit => self.should_quit = true,
        }
    }

    pub fn type_key(&mut self, keystroke: Keystroke) -> bool {
        let was_complete = self.session.is_complete();
        let changed = self.session.apply(keystroke);

        if !was_complete && self.session.is_complete() {
            info!(
                "session complete: {} wpm, {}% accuracy, {:.1}s",
                self.session.wpm(),
                self.session.accuracy(),
                self.session.elapsed_secs()
            );
        }

        changed
    }

    pub fn on_key(&mut self, key: &KeyEvent) -> bool {
        match listener::classify(key) {
            KeyAction::Type(keystroke) => self.type_key(keystroke),
            KeyAction::Command(command) => {
                self.run_command(command);
                true
            }
            KeyAction::Ignore => false,
        }
    }

    /// A left click inside `area` (the full terminal); only the Reset
    /// button reacts.
    pub fn on_click(&mut self, column: u16, row: u16, area: Rect) -> bool {
        let button = ui::reset_button_area(self.session.target(), area);
        if button.contains(Position::new(column, row)) {
            self.run_command(Command::Reset);
            return true;
        }
        false
    }

    /// Apply one runtime event. Returns true when the screen needs a redraw.
    pub fn handle_event(&mut self, event: &AppEvent, area: Rect) -> bool {
        match event {
            AppEvent::Key(key) => self.on_key(key),
            AppEvent::Click { column, row } => self.on_click(*column, *row, area),
            AppEvent::Resize => true,
            AppEvent::Tick => {
                self.session.on_tick();
                self.session.is_ticking()
            }
        }
    }
}
