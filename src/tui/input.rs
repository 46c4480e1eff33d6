// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the
// app orchestrator, or into local ViewState mutations (cursor movement,
// form editing, popup toggles).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{SetupField, ViewState};
use crate::protocol::UserCommand;

/// Maximum digits accepted in the numeric form fields.
const MAX_DIGITS: usize = 4;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to
/// the app orchestrator (pick, roster edits, quit). Returns `None` when the
/// key press was handled locally by mutating `ViewState` (cursor movement,
/// form editing, popup toggles).
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress; ignoring
    // non-Press events prevents double-processing.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Any keypress dismisses a stale error message.
    view_state.last_error = None;

    // Ctrl+C always quits immediately regardless of mode (escape hatch)
    if key_event.modifiers.contains(KeyModifiers::CONTROL)
        && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    // Quit confirmation mode: y/q confirm, n/Esc cancel, everything else blocked
    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Clear-all confirmation mode
    if view_state.confirm_clear {
        return handle_confirm_clear(key_event, view_state);
    }

    // Range-setup form
    if view_state.setup_mode {
        return handle_setup_mode(key_event, view_state);
    }

    // Add-participant form
    if view_state.add_mode {
        return handle_add_mode(key_event, view_state);
    }

    // Normal mode key dispatch
    match key_event.code {
        // Spin the wheel
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Enter => Some(UserCommand::Pick),

        // Open the range-setup form, prefilled from the last range.
        KeyCode::Char('s') => {
            let (start, end) = view_state.range.unwrap_or((1, 40));
            view_state.setup_start = start.to_string();
            view_state.setup_end = end.to_string();
            view_state.setup_field = SetupField::Start;
            view_state.setup_mode = true;
            None
        }

        // Open the add-participant form.
        KeyCode::Char('a') => {
            view_state.add_input.clear();
            view_state.add_mode = true;
            None
        }

        KeyCode::Char('r') => Some(UserCommand::ResetCounts),

        KeyCode::Char('C') => {
            view_state.confirm_clear = true;
            None
        }

        KeyCode::Char('h') => {
            view_state.show_history = !view_state.show_history;
            None
        }

        // Roster cursor
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.cursor = view_state.cursor.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if view_state.cursor + 1 < view_state.participants.len() {
                view_state.cursor += 1;
            }
            None
        }

        // Remove the participant under the cursor.
        KeyCode::Char('x') | KeyCode::Delete => view_state
            .participants
            .get(view_state.cursor)
            .map(|p| UserCommand::RemoveParticipant { id: p.id.clone() }),

        KeyCode::Char('q') | KeyCode::Esc => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('n') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

fn handle_confirm_clear(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') => {
            view_state.confirm_clear = false;
            Some(UserCommand::ClearAll)
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            view_state.confirm_clear = false;
            None
        }
        _ => None,
    }
}

fn handle_setup_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let field = active_field(view_state);
            if field.len() < MAX_DIGITS {
                field.push(c);
            }
            None
        }
        KeyCode::Backspace => {
            active_field(view_state).pop();
            None
        }
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
            view_state.setup_field = match view_state.setup_field {
                SetupField::Start => SetupField::End,
                SetupField::End => SetupField::Start,
            };
            None
        }
        KeyCode::Enter => {
            match (
                view_state.setup_start.parse::<u32>(),
                view_state.setup_end.parse::<u32>(),
            ) {
                (Ok(start), Ok(end)) => {
                    view_state.setup_mode = false;
                    Some(UserCommand::SetRoster { start, end })
                }
                _ => {
                    // Range validation itself happens in the selector; this
                    // only catches empty fields.
                    view_state.last_error = Some("start and end must be numbers".into());
                    None
                }
            }
        }
        KeyCode::Esc => {
            view_state.setup_mode = false;
            None
        }
        _ => None,
    }
}

fn handle_add_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if view_state.add_input.len() < MAX_DIGITS {
                view_state.add_input.push(c);
            }
            None
        }
        KeyCode::Backspace => {
            view_state.add_input.pop();
            None
        }
        KeyCode::Enter => match view_state.add_input.parse::<u32>() {
            Ok(number) => {
                view_state.add_mode = false;
                Some(UserCommand::AddParticipant { number })
            }
            Err(_) => {
                view_state.last_error = Some("enter a participant number".into());
                None
            }
        },
        KeyCode::Esc => {
            view_state.add_mode = false;
            None
        }
        _ => None,
    }
}

fn active_field(view_state: &mut ViewState) -> &mut String {
    match view_state.setup_field {
        SetupField::Start => &mut view_state.setup_start,
        SetupField::End => &mut view_state.setup_end,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
