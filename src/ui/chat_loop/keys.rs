//! Key handling for the chat screen.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_textarea::Input as TAInput;

use crate::core::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Submit,
    InsertNewline,
    ToggleLogging,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollTop,
    ScrollBottom,
    Edit,
    Ignore,
}

/// Decide what a key press means given the current input contents.
pub fn map_key(key: &KeyEvent, input_is_empty: bool, input_rows: usize) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let single_line = input_rows <= 1;

    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('d') if ctrl && input_is_empty => KeyAction::Quit,
        KeyCode::Esc if input_is_empty => KeyAction::Quit,
        KeyCode::Char('l') if ctrl => KeyAction::ToggleLogging,
        KeyCode::Enter if alt || shift => KeyAction::InsertNewline,
        KeyCode::Char('j') if ctrl => KeyAction::InsertNewline,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown => KeyAction::PageDown,
        KeyCode::Home if ctrl => KeyAction::ScrollTop,
        KeyCode::End if ctrl => KeyAction::ScrollBottom,
        KeyCode::Up if single_line => KeyAction::ScrollUp,
        KeyCode::Down if single_line => KeyAction::ScrollDown,
        _ => KeyAction::Edit,
    }
}

/// Apply a non-submitting action to the app. Returns `true` when the screen
/// needs a redraw.
pub fn apply_key(app: &mut App, key: KeyEvent, action: KeyAction) -> bool {
    match action {
        KeyAction::Quit => app.exit_requested = true,
        KeyAction::ToggleLogging => app.toggle_logging(),
        KeyAction::InsertNewline => app.textarea.insert_newline(),
        KeyAction::ScrollUp => app.scroll.scroll_up(1),
        KeyAction::ScrollDown => app.scroll.scroll_down(1),
        KeyAction::PageUp => app.scroll.page_up(),
        KeyAction::PageDown => app.scroll.page_down(),
        KeyAction::ScrollTop => app.scroll.scroll_to_top(),
        KeyAction::ScrollBottom => app.scroll.scroll_to_bottom(),
        KeyAction::Edit => {
            app.status = None;
            return app.textarea.input(TAInput::from(key));
        }
        KeyAction::Submit | KeyAction::Ignore => return false,
    }
    true
}
