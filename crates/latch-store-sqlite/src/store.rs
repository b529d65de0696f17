//! [`SqliteSnapshotStore`] — the SQLite implementation of [`SnapshotStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use latch_core::{snapshot::SnapshotStore, state::SessionState};

use crate::{Error, Result, schema::SCHEMA};

// ─── Saved row ───────────────────────────────────────────────────────────────

/// The persisted session together with the time it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSnapshot {
  pub state:    SessionState,
  pub saved_at: DateTime<Utc>,
}

fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A session snapshot store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteSnapshotStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteSnapshotStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The saved row, if any.
  pub async fn saved(&self) -> Result<Option<SavedSnapshot>> {
    let raw: Option<(String, String)> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT state_json, saved_at FROM session_snapshot WHERE slot = 0",
              [],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(state_json, saved_at)| -> Result<SavedSnapshot> {
        Ok(SavedSnapshot {
          state:    SessionState::from_json(&state_json)?,
          saved_at: decode_dt(&saved_at)?,
        })
      })
      .transpose()
  }
}

// ─── SnapshotStore impl ──────────────────────────────────────────────────────

impl SnapshotStore for SqliteSnapshotStore {
  type Error = Error;

  async fn load(&self) -> Result<SessionState> {
    Ok(self.saved().await?.map(|s| s.state).unwrap_or_default())
  }

  async fn save(&self, state: &SessionState) -> Result<()> {
    if !state.is_signed_in() {
      return self.clear().await;
    }

    let state_json = state.to_json()?;
    let saved_at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO session_snapshot (slot, state_json, saved_at)
           VALUES (0, ?1, ?2)
           ON CONFLICT (slot) DO UPDATE
             SET state_json = excluded.state_json,
                 saved_at   = excluded.saved_at",
          rusqlite::params![state_json, saved_at],
        )?;
        Ok(())
      })
      .await?;

    debug!("session snapshot saved");
    Ok(())
  }

  async fn clear(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute("DELETE FROM session_snapshot", [])?;
        Ok(())
      })
      .await?;

    debug!("session snapshot cleared");
    Ok(())
  }
}
