use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::session::Keystroke;

/// App-level actions triggered from the keyboard or the Reset button
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Reset,
    Quit,
}

/// What a key press means to the app
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Type(Keystroke),
    Command(Command),
    Ignore,
}

/// Translate a terminal key event.
///
/// Only printable characters and Backspace reach the session; Tab and
/// Ctrl+R reset, Esc and Ctrl+C quit.
pub fn classify(key: &KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    // AltGr arrives as Control+Alt on some platforms
    let alt_gr = ctrl && alt;

    match key.code {
        KeyCode::Char('c') if ctrl && !alt_gr => KeyAction::Command(Command::Quit),
        KeyCode::Char('r') if ctrl && !alt_gr => KeyAction::Command(Command::Reset),
        KeyCode::Char(_) if (ctrl || alt) && !alt_gr => KeyAction::Ignore,
        KeyCode::Char(c) if !c.is_control() => KeyAction::Type(Keystroke::Char(c)),
        KeyCode::Backspace => KeyAction::Type(Keystroke::Backspace),
        KeyCode::Tab => KeyAction::Command(Command::Reset),
        KeyCode::Esc => KeyAction::Command(Command::Quit),
        _ => KeyAction::Ignore,
    }
}
