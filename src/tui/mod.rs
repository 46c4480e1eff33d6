// TUI dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors relevant parts of the application
// state. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;

use crate::picker::{HistoryEntry, Participant, RosterStats, SelectionPhase};
use crate::protocol::{UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// Which field of the range-setup form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Start,
    End,
}

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator.
/// The `render_frame` function reads this struct to draw the dashboard.
pub struct ViewState {
    /// Participants in number order.
    pub participants: Vec<Participant>,
    /// History entries, newest first.
    pub history: Vec<HistoryEntry>,
    /// Presented-count statistics; `None` when the roster is empty.
    pub stats: Option<RosterStats>,
    /// Current lifecycle phase.
    pub phase: SelectionPhase,
    /// The settled participant, if any.
    pub selected: Option<Participant>,
    /// The number currently flashing on the wheel (Spinning/Revealing).
    pub spin_number: Option<u32>,
    /// Last configured range, used to prefill the setup form.
    pub range: Option<(u32, u32)>,
    /// Last error from the orchestrator, shown in the status bar until the
    /// next keypress.
    pub last_error: Option<String>,
    /// Whether the history panel shows its entries.
    pub show_history: bool,
    /// Roster cursor for remove-under-cursor.
    pub cursor: usize,
    /// Range-setup form state.
    pub setup_mode: bool,
    pub setup_start: String,
    pub setup_end: String,
    pub setup_field: SetupField,
    /// Add-participant form state.
    pub add_mode: bool,
    pub add_input: String,
    /// Confirmation popups.
    pub confirm_quit: bool,
    pub confirm_clear: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            participants: Vec::new(),
            history: Vec::new(),
            stats: None,
            phase: SelectionPhase::Idle,
            selected: None,
            spin_number: None,
            range: None,
            last_error: None,
            show_history: true,
            cursor: 0,
            setup_mode: false,
            setup_start: String::new(),
            setup_end: String::new(),
            setup_field: SetupField::Start,
            add_mode: false,
            add_input: String::new(),
            confirm_quit: false,
            confirm_clear: false,
        }
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            state.participants = snapshot.participants;
            state.history = snapshot.history;
            state.stats = snapshot.stats;
            state.phase = snapshot.phase;
            state.selected = snapshot.selected;
            if let Some(range) = snapshot.range {
                state.range = Some(range);
            }
            if !matches!(
                state.phase,
                SelectionPhase::Spinning | SelectionPhase::Revealing
            ) {
                state.spin_number = None;
            }
            // Keep the cursor on a valid row after removals.
            if state.cursor >= state.participants.len() {
                state.cursor = state.participants.len().saturating_sub(1);
            }
        }
        UiUpdate::SpinStarted => {
            state.phase = SelectionPhase::Spinning;
            state.spin_number = None;
            state.last_error = None;
        }
        UiUpdate::SpinTick { number } => {
            state.spin_number = Some(number);
        }
        UiUpdate::Revealed { number } => {
            state.phase = SelectionPhase::Revealing;
            state.spin_number = Some(number);
        }
        UiUpdate::Error(message) => {
            state.last_error = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::roster::render(frame, layout.roster, state);
    widgets::wheel::render(frame, layout.wheel, state);
    widgets::stats::render(frame, layout.stats, state);
    widgets::history::render(frame, layout.history, state);
    render_help_bar(frame, layout.help_bar);

    // Modal popups draw over the dashboard.
    if state.setup_mode {
        widgets::setup::render_range_form(frame, frame.area(), state);
    }
    if state.add_mode {
        widgets::setup::render_add_form(frame, frame.area(), state);
    }
    if state.confirm_clear {
        widgets::quit_confirm::render_clear_confirm(frame, frame.area());
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

fn render_help_bar(frame: &mut Frame, area: ratatui::layout::Rect) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        " space spin | s range | a add | x remove | r reset | C clear | h history | q quit",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// This is the main entry point for the terminal UI. It:
/// 1. Initializes the terminal (enters raw mode, enables alternate screen).
/// 2. Installs a panic hook to restore the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on clean exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    // 1. Initialize terminal
    let mut terminal = ratatui::init();

    // 2. Set panic hook to restore terminal on crash.
    //    We capture the original hook and chain ours before it.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    // 3. Create ViewState
    let mut view_state = ViewState::default();

    // 4. Create crossterm EventStream for async keyboard input
    let mut event_stream = EventStream::new();

    // 5. Create render interval (~30fps)
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // 6. Main loop
    loop {
        tokio::select! {
            // UI updates from the app orchestrator
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => {
                        apply_ui_update(&mut view_state, ui_update);
                    }
                    None => {
                        // Channel closed: app is shutting down
                        break;
                    }
                }
            }

            // Keyboard input
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {
                        // Mouse events, resize events, etc. -- ignore
                    }
                    Some(Err(_)) => {
                        // Input error -- break out
                        break;
                    }
                    None => {
                        // Stream ended
                        break;
                    }
                }
            }

            // Render tick
            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    // 7. Restore terminal
    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
