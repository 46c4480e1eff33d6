// Integration tests for fairwheel.
//
// These tests exercise the full system end-to-end using the library crate's
// public API. They verify that the major subsystems (selection lifecycle,
// command handling, persistence, restart recovery) work together correctly.

use fairwheel::app::{self, AppState};
use fairwheel::config::{
    AnimationConfig, Config, HistoryConfig, RosterConfig, SelectionConfig, StorageConfig,
};
use fairwheel::picker::{SelectionPhase, SelectionPolicy, Selector};
use fairwheel::protocol::{AppSnapshot, UiUpdate, UserCommand};
use fairwheel::store::Store;

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Build a test-ready Config with inline settings (no files).
fn inline_config() -> Config {
    Config {
        roster: RosterConfig { max_span: 100 },
        history: HistoryConfig { cap: 20 },
        selection: SelectionConfig {
            policy: SelectionPolicy::LeastPresented,
        },
        animation: AnimationConfig {
            spin_ms: 1500,
            tick_ms: 90,
            reveal_ms: 400,
        },
        storage: StorageConfig {
            path: ":memory:".into(),
        },
    }
}

/// Build a selector matching `inline_config()`.
fn selector_for(config: &Config) -> Selector {
    Selector::new(
        config.selection.policy,
        config.roster.max_span,
        config.history.cap,
    )
}

/// Build an AppState with an in-memory store and a seeded RNG.
fn app_state(seed: u64) -> AppState {
    let config = inline_config();
    let selector = selector_for(&config);
    let store = Store::open(":memory:").expect("in-memory store");
    AppState::with_rng(config, selector, Some(store), StdRng::seed_from_u64(seed))
}

fn channels() -> (mpsc::Sender<UiUpdate>, mpsc::Receiver<UiUpdate>) {
    mpsc::channel(128)
}

/// Drain the update channel, returning the last snapshot seen.
fn last_snapshot(ui_rx: &mut mpsc::Receiver<UiUpdate>) -> Option<AppSnapshot> {
    let mut snapshot = None;
    while let Ok(update) = ui_rx.try_recv() {
        if let UiUpdate::Snapshot(s) = update {
            snapshot = Some(*s);
        }
    }
    snapshot
}

/// Drive one full pick through the app handlers (pick -> reveal -> settle).
async fn run_pick(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let spin = app::handle_user_command(state, UserCommand::Pick, ui_tx).await;
    assert!(spin.is_some(), "pick should arm the spin timer");
    let reveal = app::advance_phase(state, ui_tx).await;
    assert!(reveal.is_some(), "reveal should arm the settle timer");
    let done = app::advance_phase(state, ui_tx).await;
    assert!(done.is_none(), "settle should disarm the timer");
}

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

// ===========================================================================
// Full lifecycle through the command layer
// ===========================================================================

#[tokio::test]
async fn full_pick_lifecycle_end_to_end() {
    let mut state = app_state(42);
    let (ui_tx, mut ui_rx) = channels();

    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 1, end: 40 },
        &ui_tx,
    )
    .await;
    let snapshot = last_snapshot(&mut ui_rx).expect("snapshot after setup");
    assert_eq!(snapshot.participants.len(), 40);
    assert!(snapshot
        .participants
        .iter()
        .all(|p| p.presented_count == 0 && p.streak == 0));

    run_pick(&mut state, &ui_tx).await;

    let snapshot = last_snapshot(&mut ui_rx).expect("snapshot after settle");
    assert_eq!(snapshot.phase, SelectionPhase::Settled);
    let selected = snapshot.selected.expect("a settled participant");
    assert_eq!(selected.presented_count, 1);
    assert_eq!(selected.streak, 1);
    assert!(selected.last_selected.is_some());
    assert_eq!(snapshot.history.len(), 1);
    assert_eq!(snapshot.history[0].participant_number, selected.number);
    assert_eq!(snapshot.stats.as_ref().unwrap().total, 1);
}

#[tokio::test]
async fn spin_updates_precede_the_settle_snapshot() {
    let mut state = app_state(7);
    let (ui_tx, mut ui_rx) = channels();
    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 1, end: 5 },
        &ui_tx,
    )
    .await;
    let _ = last_snapshot(&mut ui_rx);

    run_pick(&mut state, &ui_tx).await;

    // The TUI sees SpinStarted, then Revealed with the chosen number, then
    // the settle snapshot agreeing on that number.
    let mut saw_spin_started = false;
    let mut revealed = None;
    let mut settled = None;
    while let Ok(update) = ui_rx.try_recv() {
        match update {
            UiUpdate::SpinStarted => saw_spin_started = true,
            UiUpdate::Revealed { number } => revealed = Some(number),
            UiUpdate::Snapshot(s) => settled = s.selected.clone(),
            _ => {}
        }
    }
    assert!(saw_spin_started);
    let revealed = revealed.expect("revealed number");
    assert_eq!(settled.expect("settled participant").number, revealed);
}

#[tokio::test]
async fn reentrant_pick_is_rejected_until_settled() {
    let mut state = app_state(3);
    let (ui_tx, mut ui_rx) = channels();
    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 1, end: 3 },
        &ui_tx,
    )
    .await;

    app::handle_user_command(&mut state, UserCommand::Pick, &ui_tx).await;
    assert_eq!(state.selector.phase(), SelectionPhase::Spinning);

    // Mid-spin: rejected.
    let second = app::handle_user_command(&mut state, UserCommand::Pick, &ui_tx).await;
    assert!(second.is_none());

    app::advance_phase(&mut state, &ui_tx).await;
    assert_eq!(state.selector.phase(), SelectionPhase::Revealing);

    // Mid-reveal: still rejected.
    let third = app::handle_user_command(&mut state, UserCommand::Pick, &ui_tx).await;
    assert!(third.is_none());

    app::advance_phase(&mut state, &ui_tx).await;
    assert_eq!(state.selector.phase(), SelectionPhase::Settled);

    // Settled: a new pick is accepted again.
    let fourth = app::handle_user_command(&mut state, UserCommand::Pick, &ui_tx).await;
    assert!(fourth.is_some());

    let errors: Vec<String> = {
        let mut v = Vec::new();
        while let Ok(update) = ui_rx.try_recv() {
            if let UiUpdate::Error(msg) = update {
                v.push(msg);
            }
        }
        v
    };
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.contains("already in progress")));
}

#[tokio::test]
async fn removing_the_settled_participant_clears_the_selection() {
    let mut state = app_state(11);
    let (ui_tx, mut ui_rx) = channels();
    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 1, end: 4 },
        &ui_tx,
    )
    .await;
    run_pick(&mut state, &ui_tx).await;

    let settled = last_snapshot(&mut ui_rx).unwrap().selected.unwrap();
    app::handle_user_command(
        &mut state,
        UserCommand::RemoveParticipant {
            id: settled.id.clone(),
        },
        &ui_tx,
    )
    .await;

    let snapshot = last_snapshot(&mut ui_rx).unwrap();
    assert_eq!(snapshot.phase, SelectionPhase::Idle);
    assert!(snapshot.selected.is_none());
    assert_eq!(snapshot.participants.len(), 3);
    // Nobody else's counts moved.
    assert!(snapshot.participants.iter().all(|p| p.presented_count == 0));
}

// ===========================================================================
// Fairness
// ===========================================================================

#[test]
fn fairness_spread_bounded_over_long_runs() {
    for seed in [1u64, 17, 99, 2024] {
        let mut sel = Selector::new(SelectionPolicy::LeastPresented, 100, 20);
        let mut rng = StdRng::seed_from_u64(seed);
        sel.set_roster(1, 13).unwrap();

        for i in 0..500 {
            let number = sel.begin_pick(&mut rng).unwrap();
            sel.reveal();
            let settled = sel.settle(ts(i)).unwrap();
            assert_eq!(settled.number, number);

            let stats = sel.statistics().unwrap();
            assert!(
                stats.max - stats.min <= 1,
                "seed {seed}: spread exceeded 1 after pick {i}"
            );
        }
        // 500 picks over 13 participants: everyone presented 38 or 39 times.
        let stats = sel.statistics().unwrap();
        assert_eq!(stats.total, 500);
        assert!(stats.min >= 38);
    }
}

#[test]
fn single_participant_streak_never_resets() {
    let mut sel = Selector::new(SelectionPolicy::LeastPresented, 100, 20);
    let mut rng = StdRng::seed_from_u64(5);
    sel.set_roster(7, 7).unwrap();

    for i in 1..=10 {
        sel.begin_pick(&mut rng).unwrap();
        sel.reveal();
        let settled = sel.settle(ts(i)).unwrap();
        assert_eq!(settled.number, 7);
        assert_eq!(settled.streak, i as u32);
    }
}

#[test]
fn history_cap_holds_through_the_full_pick_path() {
    let mut sel = Selector::new(SelectionPolicy::LeastPresented, 100, 3);
    let mut rng = StdRng::seed_from_u64(9);
    sel.set_roster(1, 2).unwrap();

    for i in 0..10 {
        sel.begin_pick(&mut rng).unwrap();
        sel.reveal();
        sel.settle(ts(i)).unwrap();
        assert!(sel.history().len() <= 3);
    }
    // Newest first.
    let entries = sel.history().entries();
    assert_eq!(entries[0].timestamp, ts(9));
    assert_eq!(entries[2].timestamp, ts(7));
}

// ===========================================================================
// Persistence and restart recovery
// ===========================================================================

/// Helper: a unique temp database path for file-backed store tests.
fn temp_db_path(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("fairwheel_test_{}_{}.db", tag, std::process::id()))
}

fn cleanup_db(path: &std::path::Path) {
    let path_str = path.to_string_lossy();
    let _ = std::fs::remove_file(path);
    let _ = std::fs::remove_file(format!("{path_str}-wal"));
    let _ = std::fs::remove_file(format!("{path_str}-shm"));
}

#[tokio::test]
async fn state_survives_a_restart() {
    let db_path = temp_db_path("restart");
    cleanup_db(&db_path);

    let settled_number;
    {
        // First session: set up, run three picks, drop everything.
        let config = inline_config();
        let selector = selector_for(&config);
        let store = Store::open(&db_path.to_string_lossy()).unwrap();
        let mut state =
            AppState::with_rng(config, selector, Some(store), StdRng::seed_from_u64(21));
        let (ui_tx, mut ui_rx) = channels();

        app::handle_user_command(
            &mut state,
            UserCommand::SetRoster { start: 1, end: 6 },
            &ui_tx,
        )
        .await;
        for _ in 0..3 {
            run_pick(&mut state, &ui_tx).await;
        }
        settled_number = last_snapshot(&mut ui_rx).unwrap().selected.unwrap().number;
    }

    // Second session: restore from the same database.
    let config = inline_config();
    let selector = selector_for(&config);
    let store = Store::open(&db_path.to_string_lossy()).unwrap();
    let mut state = AppState::with_rng(config, selector, Some(store), StdRng::seed_from_u64(99));

    assert!(app::restore_from_store(&mut state).unwrap());
    assert_eq!(state.selector.roster().len(), 6);
    assert_eq!(state.selector.history().len(), 3);
    assert_eq!(state.range, Some((1, 6)));
    assert_eq!(state.selector.statistics().unwrap().total, 3);
    // The last settled pick is at the head of the restored history.
    assert_eq!(
        state.selector.history().entries()[0].participant_number,
        settled_number
    );
    // The restored session starts Idle and accepts a pick immediately.
    assert_eq!(state.selector.phase(), SelectionPhase::Idle);
    let (ui_tx, _ui_rx) = channels();
    run_pick(&mut state, &ui_tx).await;
    assert_eq!(state.selector.statistics().unwrap().total, 4);

    cleanup_db(&db_path);
}

#[tokio::test]
async fn persisted_timestamps_round_trip_through_iso8601() {
    let mut state = app_state(31);
    let (ui_tx, _ui_rx) = channels();
    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 1, end: 2 },
        &ui_tx,
    )
    .await;
    run_pick(&mut state, &ui_tx).await;

    let store = state.store.as_ref().unwrap();

    // The raw persisted value holds ISO-8601 strings...
    let raw = store
        .load_state(fairwheel::store::KEY_HISTORY)
        .unwrap()
        .unwrap();
    let stamp = raw[0]["timestamp"].as_str().expect("ISO-8601 string");
    assert!(stamp.contains('T'));

    // ...which parse back into real timestamps equal to the in-memory ones.
    let loaded = store.load_history().unwrap().unwrap();
    assert_eq!(loaded, state.selector.history().entries().to_vec());
}

#[tokio::test]
async fn clear_all_then_restart_starts_fresh_with_old_range() {
    let db_path = temp_db_path("clear");
    cleanup_db(&db_path);

    {
        let config = inline_config();
        let selector = selector_for(&config);
        let store = Store::open(&db_path.to_string_lossy()).unwrap();
        let mut state =
            AppState::with_rng(config, selector, Some(store), StdRng::seed_from_u64(4));
        let (ui_tx, _ui_rx) = channels();

        app::handle_user_command(
            &mut state,
            UserCommand::SetRoster { start: 10, end: 20 },
            &ui_tx,
        )
        .await;
        run_pick(&mut state, &ui_tx).await;
        app::handle_user_command(&mut state, UserCommand::ClearAll, &ui_tx).await;
    }

    let config = inline_config();
    let selector = selector_for(&config);
    let store = Store::open(&db_path.to_string_lossy()).unwrap();
    let mut state = AppState::with_rng(config, selector, Some(store), StdRng::seed_from_u64(5));

    // No roster to restore, but the range prefill survives.
    assert!(!app::restore_from_store(&mut state).unwrap());
    assert!(state.selector.roster().is_empty());
    assert_eq!(state.range, Some((10, 20)));

    cleanup_db(&db_path);
}

// ===========================================================================
// Validation errors through the command layer
// ===========================================================================

#[tokio::test]
async fn invalid_ranges_and_empty_picks_surface_errors() {
    let mut state = app_state(1);
    let (ui_tx, mut ui_rx) = channels();

    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 5, end: 3 },
        &ui_tx,
    )
    .await;
    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 1, end: 200 },
        &ui_tx,
    )
    .await;
    app::handle_user_command(&mut state, UserCommand::Pick, &ui_tx).await;

    let mut errors = Vec::new();
    while let Ok(update) = ui_rx.try_recv() {
        if let UiUpdate::Error(msg) = update {
            errors.push(msg);
        }
    }
    assert_eq!(errors.len(), 3);
    assert!(errors[0].contains("invalid range"));
    assert!(errors[1].contains("invalid range"));
    assert!(errors[2].contains("empty roster"));
    assert!(state.selector.roster().is_empty());
}

#[tokio::test]
async fn duplicate_add_is_a_silent_noop() {
    let mut state = app_state(2);
    let (ui_tx, mut ui_rx) = channels();
    app::handle_user_command(
        &mut state,
        UserCommand::SetRoster { start: 1, end: 3 },
        &ui_tx,
    )
    .await;

    app::handle_user_command(&mut state, UserCommand::AddParticipant { number: 2 }, &ui_tx)
        .await;

    let mut errors = 0;
    while let Ok(update) = ui_rx.try_recv() {
        if matches!(update, UiUpdate::Error(_)) {
            errors += 1;
        }
    }
    assert_eq!(errors, 0);
    assert_eq!(state.selector.roster().len(), 3);
}
