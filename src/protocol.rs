// Message types exchanged between the app orchestrator and the TUI.

use crate::picker::{HistoryEntry, Participant, RosterStats, SelectionPhase};

/// Commands from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Replace the roster with the inclusive range `start..=end`.
    SetRoster { start: u32, end: u32 },
    /// Start the selection wheel.
    Pick,
    /// Zero all presented counts and streaks, clear history.
    ResetCounts,
    /// Insert a single participant by number.
    AddParticipant { number: u32 },
    /// Remove a participant by identifier.
    RemoveParticipant { id: String },
    /// Drop roster, history, and selection entirely.
    ClearAll,
    Quit,
}

/// Updates from the app orchestrator to the TUI.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    /// Full refresh of roster/history/stats after a state change.
    Snapshot(Box<AppSnapshot>),
    /// The wheel started spinning.
    SpinStarted,
    /// A placeholder number to flash on the wheel while Spinning.
    SpinTick { number: u32 },
    /// The spin finished and the chosen number is now visible; bookkeeping
    /// follows with the settle snapshot.
    Revealed { number: u32 },
    /// A user-facing error message (invalid range, pick in progress, ...).
    Error(String),
}

/// Everything the TUI needs to render the dashboard.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
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
    /// The last configured range, used to prefill the setup form.
    pub range: Option<(u32, u32)>,
}
