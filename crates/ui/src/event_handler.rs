use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Result;
use std::time::Duration;

use crate::state::AppState;

/// Actions that can be triggered by key events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Send the composed message
    SendMessage { message: String },
    /// Send the n-th (0-based) suggested action of the latest message
    SendSuggestion { index: usize },
    /// Submit the latest adaptive card with its default values
    SubmitCard,
    /// Scroll the transcript up by rows
    ScrollUp(u16),
    /// Scroll the transcript down by rows
    ScrollDown(u16),
    PageUp,
    PageDown,
    ScrollTop,
    ScrollBottom,
    /// Quit the application
    Exit,
}

/// Event handler for the TUI application
pub struct EventHandler;

impl EventHandler {
    /// Read a terminal event if one is ready, without blocking
    pub fn read() -> Result<Option<Event>> {
        if crossterm::event::poll(Duration::ZERO)? { Ok(Some(crossterm::event::read()?)) } else { Ok(None) }
    }

    /// Handle a keyboard event, editing the composer in place
    ///
    /// Returns the action the app should perform, if any.
    pub fn handle_key_event(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);

        match event.code {
            KeyCode::Esc => return Some(KeyAction::Exit),
            KeyCode::Char('c') if ctrl => return Some(KeyAction::Exit),
            KeyCode::Char('s') if ctrl => return Some(KeyAction::SubmitCard),
            KeyCode::Char('u') if ctrl => return Some(KeyAction::PageUp),
            KeyCode::Char('d') if ctrl => return Some(KeyAction::PageDown),
            KeyCode::Char('p') if ctrl => state.input.recall_older(),
            KeyCode::Char('n') if ctrl => state.input.recall_newer(),
            KeyCode::Char('a') if ctrl => state.input.move_home(),
            KeyCode::Char('e') if ctrl => state.input.move_end(),
            KeyCode::Up => return Some(KeyAction::ScrollUp(1)),
            KeyCode::Down => return Some(KeyAction::ScrollDown(1)),
            KeyCode::PageUp => return Some(KeyAction::PageUp),
            KeyCode::PageDown => return Some(KeyAction::PageDown),
            KeyCode::Home => return Some(KeyAction::ScrollTop),
            KeyCode::End => return Some(KeyAction::ScrollBottom),
            KeyCode::Left => state.input.move_left(),
            KeyCode::Right => state.input.move_right(),
            KeyCode::Backspace => state.input.backspace(),
            KeyCode::Delete => state.input.delete(),
            KeyCode::Enter => {
                state.clear_error();
                return state.input.submit().map(|message| KeyAction::SendMessage { message });
            }
            KeyCode::Char(c @ '1'..='9') if state.input.is_empty() => {
                state.clear_error();
                return Some(KeyAction::SendSuggestion { index: (c as usize) - ('1' as usize) });
            }
            KeyCode::Char(c) if !ctrl => {
                state.input.stop_recall();
                state.input.insert_char(c);
            }
            _ => {}
        }

        None
    }
}
