// fairwheel entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Open the store (degrade to in-memory if it fails)
// 4. Build the selector, restore persisted state
// 5. Create mpsc channels
// 6. Spawn the app orchestrator task
// 7. Run the TUI event loop (blocking until the user quits)
// 8. Cleanup on exit

use fairwheel::app::{self, AppState};
use fairwheel::config;
use fairwheel::picker::Selector;
use fairwheel::store::Store;
use fairwheel::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not the terminal the TUI owns)
    init_tracing()?;
    info!("fairwheel starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: max span {}, history cap {}, policy {:?}",
        config.roster.max_span, config.history.cap, config.selection.policy
    );

    // 3. Open the store. Persistence is best-effort: when the database
    //    cannot be opened the app runs in-memory for this session.
    let store_path = config.storage_path();
    if let Some(parent) = store_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let store = match Store::open(&store_path.to_string_lossy()) {
        Ok(store) => {
            info!("Store opened at {}", store_path.display());
            Some(store)
        }
        Err(e) => {
            warn!(
                "Store unavailable ({:#}), continuing without persistence",
                e
            );
            None
        }
    };

    // 4. Build the selector and restore persisted state
    let selector = Selector::new(
        config.selection.policy,
        config.roster.max_span,
        config.history.cap,
    );
    let mut app_state = AppState::new(config, selector, store);

    match app::restore_from_store(&mut app_state) {
        Ok(true) => info!("Roster restored from previous session"),
        Ok(false) => info!("Starting with an empty roster"),
        Err(e) => warn!("Restore failed ({:#}), starting fresh", e),
    }

    // 5. Create mpsc channels
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    // 6. Spawn the app orchestrator task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 7. Run the TUI event loop (blocking until the user quits)
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 8. Cleanup: wait for the app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("fairwheel shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by
/// the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("fairwheel.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fairwheel=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
