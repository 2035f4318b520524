//! SQL schema for the matchlog SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! revision for anyone inspecting the file by hand.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids monotonic even after rows (or all rows) are deleted.
CREATE TABLE IF NOT EXISTS matches (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    team_name      TEXT    NOT NULL,
    opponent_name  TEXT    NOT NULL,
    league_name    TEXT    NOT NULL,
    match_datetime TEXT    NOT NULL,   -- ISO 8601, naive local time
    match_creator  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS matches_datetime_idx ON matches(match_datetime);

PRAGMA user_version = 1;
";
