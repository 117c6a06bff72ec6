//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::{App, InputMode};
use crate::clock::Clock;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key<C: Clock>(app: &mut App<C>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }
    match app.mode {
        InputMode::Normal => handle_command(app, key.code),
        InputMode::ConfirmRemove(_) => match key.code {
            KeyCode::Char('y' | 'Y') => app.confirm_remove(),
            _ => app.cancel(),
        },
        InputMode::Name | InputMode::Wattage | InputMode::Rate => match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Esc => app.cancel(),
            KeyCode::Tab | KeyCode::BackTab => app.next_field(),
            KeyCode::Backspace => app.pop_char(),
            KeyCode::Char(c) => app.push_char(c),
            _ => {}
        },
    }
}

fn handle_command<C: Clock>(app: &mut App<C>, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Enter | KeyCode::Char(' ' | 't') => app.toggle_selected(),
        KeyCode::Char('a') => app.begin_add(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_remove(),
        KeyCode::Char('u') => app.undo(),
        KeyCode::Char('r') => app.begin_rate_edit(),
        KeyCode::Char('e') => app.export(),
        _ => {}
    }
}
