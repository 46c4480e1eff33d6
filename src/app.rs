// Application state and orchestration logic.
//
// The central event loop that coordinates user commands from the TUI with
// the selection lifecycle. The timed phase transitions (spin -> reveal ->
// settle) are driven here with deadline timers so the loop stays
// responsive: a pick command arriving mid-spin is rejected immediately
// instead of queueing a re-entrant pick. Every mutation is persisted
// fire-and-forget and pushed to the TUI as a fresh snapshot.

use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::config::Config;
use crate::picker::{SelectionPhase, Selector};
use crate::protocol::{AppSnapshot, UiUpdate, UserCommand};
use crate::store::Store;

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub config: Config,
    pub selector: Selector,
    /// Absent when the store could not be opened; the app then runs
    /// in-memory only.
    pub store: Option<Store>,
    /// Last configured range, for prefilling the setup form.
    pub range: Option<(u32, u32)>,
    rng: StdRng,
}

impl AppState {
    /// Create a new AppState with an entropy-seeded RNG.
    pub fn new(config: Config, selector: Selector, store: Option<Store>) -> Self {
        Self::with_rng(config, selector, store, StdRng::from_entropy())
    }

    /// Create an AppState with an explicit RNG (deterministic tests).
    pub fn with_rng(
        config: Config,
        selector: Selector,
        store: Option<Store>,
        rng: StdRng,
    ) -> Self {
        AppState {
            config,
            selector,
            store,
            range: None,
            rng,
        }
    }

    /// Capture the current state into a snapshot the TUI can apply in one
    /// shot.
    pub fn build_snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            participants: self.selector.roster().participants().to_vec(),
            history: self.selector.history().entries().to_vec(),
            stats: self.selector.statistics(),
            phase: self.selector.phase(),
            selected: self.selector.settled_participant().cloned(),
            range: self.range,
        }
    }

    fn persist_roster(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_roster(self.selector.roster()) {
                warn!("failed to persist roster: {:#}", e);
            }
        }
    }

    fn persist_history(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_history(self.selector.history().entries()) {
                warn!("failed to persist history: {:#}", e);
            }
        }
    }

    fn persist_range(&self, start: u32, end: u32) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save_range(start, end) {
                warn!("failed to persist range: {:#}", e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Startup restore
// ---------------------------------------------------------------------------

/// Restore roster, history, and range from the store at startup.
///
/// Returns `true` when a persisted roster was installed. Without a store
/// (or without saved data) the app starts fresh.
pub fn restore_from_store(state: &mut AppState) -> anyhow::Result<bool> {
    let Some(store) = &state.store else {
        return Ok(false);
    };

    state.range = store.load_range()?;
    let history = store.load_history()?.unwrap_or_default();
    match store.load_roster()? {
        Some(roster) => {
            info!(
                "restored {} participants and {} history entries",
                roster.len(),
                history.len()
            );
            state.selector.restore(roster, history);
            Ok(true)
        }
        None => Ok(false),
    }
}

// ---------------------------------------------------------------------------
// Command handling
// ---------------------------------------------------------------------------

/// Handle a user command from the TUI.
///
/// Returns the spin duration when a pick was started, so the caller can arm
/// the phase deadline timer.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) -> Option<Duration> {
    match cmd {
        UserCommand::SetRoster { start, end } => {
            match state.selector.set_roster(start, end) {
                Ok(()) => {
                    info!("roster set to {}..={}", start, end);
                    state.range = Some((start, end));
                    state.persist_roster();
                    state.persist_history();
                    state.persist_range(start, end);
                    send_snapshot(state, ui_tx).await;
                }
                Err(e) => {
                    warn!("rejected roster range {}..={}: {}", start, end, e);
                    let _ = ui_tx.send(UiUpdate::Error(e.to_string())).await;
                }
            }
            None
        }

        UserCommand::Pick => match state.selector.begin_pick(&mut state.rng) {
            Ok(number) => {
                info!("pick started, drew participant {}", number);
                let _ = ui_tx.send(UiUpdate::SpinStarted).await;
                Some(Duration::from_millis(state.config.animation.spin_ms))
            }
            Err(e) => {
                let _ = ui_tx.send(UiUpdate::Error(e.to_string())).await;
                None
            }
        },

        UserCommand::ResetCounts => {
            state.selector.reset_counts();
            info!("presented counts reset");
            state.persist_roster();
            state.persist_history();
            send_snapshot(state, ui_tx).await;
            None
        }

        UserCommand::AddParticipant { number } => {
            if state.selector.add_participant(number) {
                info!("added participant {}", number);
                state.persist_roster();
                send_snapshot(state, ui_tx).await;
            } else {
                // Duplicate numbers are a documented no-op.
                info!("ignored duplicate participant {}", number);
            }
            None
        }

        UserCommand::RemoveParticipant { id } => {
            if state.selector.remove_participant(&id) {
                info!("removed {}", id);
                state.persist_roster();
                send_snapshot(state, ui_tx).await;
            }
            None
        }

        UserCommand::ClearAll => {
            state.selector.clear_all();
            info!("cleared roster and history");
            if let Some(store) = &state.store {
                if let Err(e) = store.clear_all() {
                    warn!("failed to clear persisted state: {:#}", e);
                }
            }
            send_snapshot(state, ui_tx).await;
            None
        }

        UserCommand::Quit => None, // handled by the caller's loop
    }
}

/// Advance a timed phase transition (spin deadline or reveal deadline).
///
/// Returns the delay until the next transition, or `None` once the pick has
/// settled (or was dropped).
pub async fn advance_phase(
    state: &mut AppState,
    ui_tx: &mpsc::Sender<UiUpdate>,
) -> Option<Duration> {
    match state.selector.phase() {
        SelectionPhase::Spinning => {
            state.selector.reveal();
            if let Some(number) = state.selector.pending_number() {
                let _ = ui_tx.send(UiUpdate::Revealed { number }).await;
            }
            Some(Duration::from_millis(state.config.animation.reveal_ms))
        }
        SelectionPhase::Revealing => {
            match state.selector.settle(Utc::now()) {
                Some(p) => info!(
                    "settled on participant {} (presented {} times)",
                    p.number, p.presented_count
                ),
                None => warn!("selection dropped: pending participant left the roster"),
            }
            state.persist_roster();
            state.persist_history();
            send_snapshot(state, ui_tx).await;
            None
        }
        // Idle/Settled: stale deadline, nothing to advance.
        _ => None,
    }
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.build_snapshot();
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens with `tokio::select!` on:
/// 1. User commands from the TUI
/// 2. The spin tick interval (placeholder numbers, only while Spinning)
/// 3. The phase deadline timer (spin -> reveal -> settle)
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("application event loop started");

    let mut spin_tick =
        tokio::time::interval(Duration::from_millis(state.config.animation.tick_ms));
    spin_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    // Deadline for the next timed phase transition; None outside a pick.
    let mut phase_deadline: Option<Instant> = None;

    // Initial snapshot so the TUI renders restored state immediately.
    send_snapshot(&state, &ui_tx).await;

    loop {
        // select! needs a concrete instant even when no transition is due.
        let deadline =
            phase_deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) | None => {
                        info!("quit received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        if let Some(delay) = handle_user_command(&mut state, cmd, &ui_tx).await {
                            phase_deadline = Some(Instant::now() + delay);
                            spin_tick.reset();
                        }
                    }
                }
            }

            _ = spin_tick.tick(), if state.selector.phase() == SelectionPhase::Spinning => {
                if let Some(number) = state.selector.placeholder(&mut state.rng) {
                    let _ = ui_tx.send(UiUpdate::SpinTick { number }).await;
                }
            }

            _ = tokio::time::sleep_until(deadline), if phase_deadline.is_some() => {
                phase_deadline = advance_phase(&mut state, &ui_tx)
                    .await
                    .map(|delay| Instant::now() + delay);
            }
        }
    }

    info!("application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
