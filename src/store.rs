// SQLite persistence layer for the roster, history, and range settings.
//
// A single key-value table holds JSON-encoded values. Persistence is
// best-effort: callers log and continue when a save fails, and the app runs
// in-memory-only when the store cannot be opened at all.

use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::picker::{HistoryEntry, Participant, Roster};

/// Key for the persisted participant list.
pub const KEY_ROSTER: &str = "roster";
/// Key for the persisted selection history.
pub const KEY_HISTORY: &str = "history";
/// Keys for the last configured range bounds.
pub const KEY_RANGE_START: &str = "range-start";
pub const KEY_RANGE_END: &str = "range-end";

/// SQLite-backed key-value persistence for picker state.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) a SQLite database at `path` and ensure the state
    /// table exists. Pass `":memory:"` for an ephemeral database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open store at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set store pragmas")?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS picker_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .context("failed to create store schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex poisoned")
    }

    /// Persist an arbitrary JSON value under `key`. Uses INSERT OR REPLACE
    /// so repeated saves overwrite the previous value.
    pub fn save_state(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let conn = self.conn();
        let json_str = serde_json::to_string(value).context("failed to serialize state value")?;
        conn.execute(
            "INSERT OR REPLACE INTO picker_state (key, value) VALUES (?1, ?2)",
            params![key, json_str],
        )
        .context("failed to save state")?;
        Ok(())
    }

    /// Load a previously saved JSON value by `key`. Returns `None` if the
    /// key does not exist.
    pub fn load_state(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT value FROM picker_state WHERE key = ?1")
            .context("failed to prepare load_state query")?;

        let mut rows = stmt
            .query_map(params![key], |row| {
                let json_str: String = row.get(0)?;
                Ok(json_str)
            })
            .context("failed to query picker state")?;

        match rows.next() {
            Some(row_result) => {
                let json_str = row_result.context("failed to read state row")?;
                let value: serde_json::Value = serde_json::from_str(&json_str)
                    .context("failed to deserialize state value")?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete a key. Missing keys are a no-op.
    pub fn remove_state(&self, key: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute("DELETE FROM picker_state WHERE key = ?1", params![key])
            .context("failed to remove state")?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Typed helpers
    // ------------------------------------------------------------------

    /// Persist the participant list. Timestamps serialize as ISO-8601
    /// strings via chrono's serde support.
    pub fn save_roster(&self, roster: &Roster) -> Result<()> {
        let value =
            serde_json::to_value(roster.participants()).context("failed to encode roster")?;
        self.save_state(KEY_ROSTER, &value)
    }

    /// Load the persisted participant list, if any.
    pub fn load_roster(&self) -> Result<Option<Roster>> {
        match self.load_state(KEY_ROSTER)? {
            Some(value) => {
                let participants: Vec<Participant> =
                    serde_json::from_value(value).context("failed to decode roster")?;
                Ok(Some(Roster::from_participants(participants)))
            }
            None => Ok(None),
        }
    }

    /// Persist the selection history (newest first).
    pub fn save_history(&self, entries: &[HistoryEntry]) -> Result<()> {
        let value = serde_json::to_value(entries).context("failed to encode history")?;
        self.save_state(KEY_HISTORY, &value)
    }

    /// Load the persisted selection history, if any. The stored ISO-8601
    /// timestamp strings are parsed back into real timestamps here.
    pub fn load_history(&self) -> Result<Option<Vec<HistoryEntry>>> {
        match self.load_state(KEY_HISTORY)? {
            Some(value) => {
                let entries: Vec<HistoryEntry> =
                    serde_json::from_value(value).context("failed to decode history")?;
                Ok(Some(entries))
            }
            None => Ok(None),
        }
    }

    /// Persist the last configured range bounds.
    pub fn save_range(&self, start: u32, end: u32) -> Result<()> {
        self.save_state(KEY_RANGE_START, &serde_json::json!(start))?;
        self.save_state(KEY_RANGE_END, &serde_json::json!(end))
    }

    /// Load the last configured range. Returns `None` unless both bounds
    /// are present.
    pub fn load_range(&self) -> Result<Option<(u32, u32)>> {
        let start = self
            .load_state(KEY_RANGE_START)?
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok());
        let end = self
            .load_state(KEY_RANGE_END)?
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok());
        Ok(start.zip(end))
    }

    /// Delete the persisted roster and history. The stored range bounds are
    /// kept so the setup form stays prefilled. Uses a transaction with
    /// automatic rollback on error.
    pub fn clear_all(&self) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction().context("failed to begin transaction")?;
        tx.execute(
            "DELETE FROM picker_state WHERE key = ?1",
            params![KEY_ROSTER],
        )
        .context("failed to delete roster")?;
        tx.execute(
            "DELETE FROM picker_state WHERE key = ?1",
            params![KEY_HISTORY],
        )
        .context("failed to delete history")?;
        tx.commit().context("failed to commit clear_all")?;
        Ok(())
    }
}
