//! [`SqliteStore`], the SQLite implementation of [`MatchStore`].

use std::path::Path;

use chrono::NaiveDateTime;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use matchlog_core::{
  record::{DeleteOutcome, MatchId, MatchRecord, NewMatch, Requester},
  store::MatchStore,
};

use crate::{
  Error, Result,
  encode::{MATCH_COLUMNS, RawMatch, encode_dt, encode_user},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A match store backed by a single SQLite file.
///
/// Cloning is cheap; clones share the one background connection, which
/// executes calls strictly one at a time. That is the store's only lock.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
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

  /// Run a `SELECT {MATCH_COLUMNS} ...` statement and decode every row.
  async fn select_records(&self, sql: String, params: Vec<String>) -> Result<Vec<MatchRecord>> {
    let raws: Vec<RawMatch> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawMatch::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMatch::into_record).collect()
  }
}

// ─── MatchStore impl ─────────────────────────────────────────────────────────

impl MatchStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert(&self, input: NewMatch) -> Result<MatchRecord> {
    let valid = input.validate()?;

    let team     = valid.team_name.clone();
    let opponent = valid.opponent_name.clone();
    let league   = valid.league_name.clone();
    let at_str   = encode_dt(valid.match_datetime);
    let creator  = encode_user(valid.creator);

    let id: MatchId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO matches (team_name, opponent_name, league_name, match_datetime, match_creator)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![team, opponent, league, at_str, creator],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    debug!(id, "inserted match");
    Ok(valid.into_record(id))
  }

  async fn delete_by_id(&self, id: MatchId, requester: Requester) -> Result<DeleteOutcome> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let raw = tx
          .query_row(
            &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"),
            rusqlite::params![id],
            RawMatch::from_row,
          )
          .optional()?;

        let Some(raw) = raw else {
          return Ok(DeleteOutcome::NotFound);
        };
        let record = raw
          .into_record()
          .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;

        if !requester.may_delete(&record) {
          return Ok(DeleteOutcome::Forbidden);
        }

        tx.execute("DELETE FROM matches WHERE id = ?1", rusqlite::params![id])?;
        tx.commit()?;
        Ok(DeleteOutcome::Deleted(record))
      })
      .await?;

    debug!(id, requester = requester.user_id, ?outcome, "delete by id");
    Ok(outcome)
  }

  async fn delete_all(&self) -> Result<usize> {
    let removed = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM matches", [])?))
      .await?;
    Ok(removed)
  }

  async fn purge_before(&self, cutoff: NaiveDateTime) -> Result<usize> {
    let cutoff_str = encode_dt(cutoff);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM matches WHERE match_datetime < ?1",
          rusqlite::params![cutoff_str],
        )?)
      })
      .await?;

    debug!(removed, %cutoff, "purged old matches");
    Ok(removed)
  }

  async fn snapshot_to<'a>(&'a self, path: &'a Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }

    let dest = path.to_path_buf();
    self
      .conn
      .call(move |conn| {
        conn.backup(rusqlite::DatabaseName::Main, &dest, None)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get(&self, id: MatchId) -> Result<Option<MatchRecord>> {
    let raw: Option<RawMatch> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"),
            rusqlite::params![id],
            RawMatch::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawMatch::into_record).transpose()
  }

  async fn list_between(
    &self,
    start: NaiveDateTime,
    end:   NaiveDateTime,
  ) -> Result<Vec<MatchRecord>> {
    self
      .select_records(
        format!(
          "SELECT {MATCH_COLUMNS} FROM matches
           WHERE match_datetime >= ?1 AND match_datetime <= ?2
           ORDER BY match_datetime, id"
        ),
        vec![encode_dt(start), encode_dt(end)],
      )
      .await
  }

  async fn export_all(&self) -> Result<Vec<MatchRecord>> {
    self
      .select_records(format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY id"), vec![])
      .await
  }

  async fn count(&self) -> Result<usize> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM matches", [], |r| r.get(0))?))
      .await?;
    Ok(n as usize)
  }

  async fn ping(&self) -> Result<()> {
    self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT 1", [], |_| Ok(()))?))
      .await?;
    Ok(())
  }
}
