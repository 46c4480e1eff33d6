// The selection algorithm and its lifecycle state machine.
//
// A pick moves through Idle -> Spinning -> Revealing -> Settled. The
// candidate is drawn up front in `begin_pick`; the orchestrator drives the
// timed transitions and calls `settle` to commit the bookkeeping. Only Idle
// and Settled accept a new pick; an in-flight pick runs to completion.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::history::{History, HistoryEntry};
use super::roster::{Participant, Roster, RosterStats};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// Range rejected: start must be >= 1, end >= start, and the span at
    /// most `max_span`.
    #[error("invalid range {start}..={end} (start >= 1, end >= start, span <= {max_span})")]
    InvalidRange { start: u32, end: u32, max_span: u32 },

    #[error("cannot pick from an empty roster")]
    EmptyRoster,

    #[error("a selection is already in progress")]
    SelectionInProgress,
}

// ---------------------------------------------------------------------------
// Policy and phase
// ---------------------------------------------------------------------------

/// Which pool a pick draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Only participants tied for the minimum presented count are
    /// candidates; more-presented participants are excluded until the rest
    /// catch up. Keeps max(count) - min(count) <= 1 over any run.
    LeastPresented,
    /// Every participant is a candidate; the streak counter is the only
    /// visible bias feedback.
    Uniform,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::LeastPresented
    }
}

/// Lifecycle phase of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionPhase {
    #[default]
    Idle,
    Spinning,
    Revealing,
    Settled,
}

impl SelectionPhase {
    /// Whether a new pick may start from this phase.
    pub fn accepts_pick(self) -> bool {
        matches!(self, SelectionPhase::Idle | SelectionPhase::Settled)
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Owns the roster and history and implements the picking lifecycle.
#[derive(Debug, Clone)]
pub struct Selector {
    roster: Roster,
    history: History,
    policy: SelectionPolicy,
    max_span: u32,
    phase: SelectionPhase,
    /// Number drawn for the in-flight pick (Spinning/Revealing only).
    pending: Option<u32>,
    /// Participant id of the settled selection.
    settled: Option<String>,
}

impl Selector {
    pub fn new(policy: SelectionPolicy, max_span: u32, history_cap: usize) -> Self {
        Selector {
            roster: Roster::default(),
            history: History::new(history_cap),
            policy,
            max_span,
            phase: SelectionPhase::Idle,
            pending: None,
            settled: None,
        }
    }

    /// Install persisted roster and history, e.g. at startup. The lifecycle
    /// resets to Idle; counts and timestamps come from the stored values.
    pub fn restore(&mut self, roster: Roster, history: Vec<HistoryEntry>) {
        let cap = self.history.cap();
        self.roster = roster;
        self.history = History::from_entries(history, cap);
        self.phase = SelectionPhase::Idle;
        self.pending = None;
        self.settled = None;
    }

    /// Replace the roster with fresh participants numbered `start..=end`.
    ///
    /// Clears history and prior counts and resets the lifecycle to Idle.
    pub fn set_roster(&mut self, start: u32, end: u32) -> Result<(), SelectorError> {
        if start < 1 || end < start || end - start + 1 > self.max_span {
            return Err(SelectorError::InvalidRange {
                start,
                end,
                max_span: self.max_span,
            });
        }
        self.roster = Roster::from_range(start, end);
        self.history.clear();
        self.phase = SelectionPhase::Idle;
        self.pending = None;
        self.settled = None;
        Ok(())
    }

    /// Draw the next participant and enter Spinning.
    ///
    /// The returned number is the pick's final outcome; the spin is pure
    /// presentation. Rejected while a pick is in flight.
    pub fn begin_pick(&mut self, rng: &mut impl Rng) -> Result<u32, SelectorError> {
        if !self.phase.accepts_pick() {
            return Err(SelectorError::SelectionInProgress);
        }
        if self.roster.is_empty() {
            return Err(SelectorError::EmptyRoster);
        }
        let candidates = self.candidates();
        let number = *candidates.choose(rng).expect("candidate pool is non-empty");
        self.pending = Some(number);
        self.phase = SelectionPhase::Spinning;
        Ok(number)
    }

    /// A random roster number to flash on the wheel while Spinning.
    pub fn placeholder(&self, rng: &mut impl Rng) -> Option<u32> {
        self.roster.participants().choose(rng).map(|p| p.number)
    }

    /// Spinning -> Revealing. The distinction is visual only; bookkeeping
    /// waits for `settle`.
    pub fn reveal(&mut self) {
        if self.phase == SelectionPhase::Spinning {
            self.phase = SelectionPhase::Revealing;
        }
    }

    /// Commit the in-flight pick: bump the chosen participant's count and
    /// streak, reset everyone else's streak, stamp `last_selected`, and
    /// append a history entry.
    ///
    /// Returns `None` (and falls back to Idle) when the pending participant
    /// left the roster mid-pick.
    pub fn settle(&mut self, now: DateTime<Utc>) -> Option<&Participant> {
        let number = match self.pending.take() {
            Some(n) => n,
            None => {
                self.phase = SelectionPhase::Idle;
                return None;
            }
        };

        if self.roster.by_number(number).is_none() {
            warn!("pending participant {} left the roster mid-pick", number);
            self.phase = SelectionPhase::Idle;
            self.settled = None;
            return None;
        }

        for p in self.roster.participants_mut() {
            if p.number != number {
                p.streak = 0;
            }
        }
        let chosen = self
            .roster
            .by_number_mut(number)
            .expect("pending participant is on the roster");
        chosen.presented_count += 1;
        chosen.streak += 1;
        chosen.last_selected = Some(now);
        let id = chosen.id.clone();

        self.history.record(number, now);
        self.settled = Some(id);
        self.phase = SelectionPhase::Settled;
        self.roster.by_number(number)
    }

    /// Zero all counts and streaks and clear the history. Membership and
    /// the visible selection are unchanged.
    pub fn reset_counts(&mut self) {
        self.roster.reset_counts();
        self.history.clear();
    }

    /// Drop the roster, history, and selection entirely.
    pub fn clear_all(&mut self) {
        self.roster = Roster::default();
        self.history.clear();
        self.phase = SelectionPhase::Idle;
        self.pending = None;
        self.settled = None;
    }

    /// Insert a participant with the given number. A duplicate number is a
    /// no-op and returns `false`.
    pub fn add_participant(&mut self, number: u32) -> bool {
        self.roster.add(number)
    }

    /// Remove a participant by id. If it was the settled selection, the
    /// visible selection clears back to Idle; other participants' counts
    /// are untouched.
    pub fn remove_participant(&mut self, id: &str) -> bool {
        let removed = self.roster.remove(id).is_some();
        if removed && self.settled.as_deref() == Some(id) {
            self.settled = None;
            if self.phase == SelectionPhase::Settled {
                self.phase = SelectionPhase::Idle;
            }
        }
        removed
    }

    /// Presented-count statistics, `None` for an empty roster.
    pub fn statistics(&self) -> Option<RosterStats> {
        self.roster.stats()
    }

    // -- accessors ---------------------------------------------------------

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// The settled participant, if the current phase has one.
    pub fn settled_participant(&self) -> Option<&Participant> {
        self.settled.as_deref().and_then(|id| self.roster.by_id(id))
    }

    /// The number drawn for the in-flight pick, if any.
    pub fn pending_number(&self) -> Option<u32> {
        self.pending
    }

    /// The candidate pool for the next pick under the active policy.
    fn candidates(&self) -> Vec<u32> {
        match self.policy {
            SelectionPolicy::LeastPresented => self.roster.least_presented_numbers(),
            SelectionPolicy::Uniform => self.roster.numbers(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
