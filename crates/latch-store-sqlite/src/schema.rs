//! SQL schema for the Latch snapshot store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- At most one row: the current session. A signed-out session has no row.
CREATE TABLE IF NOT EXISTS session_snapshot (
    slot        INTEGER PRIMARY KEY CHECK (slot = 0),
    state_json  TEXT NOT NULL,   -- JSON-encoded SessionState
    saved_at    TEXT NOT NULL    -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";
