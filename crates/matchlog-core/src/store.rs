//! The `MatchStore` trait.
//!
//! Implemented by storage backends (e.g. `matchlog-store-sqlite`). The bot and
//! the retention sweeper depend on this abstraction, not on any concrete
//! backend.

use std::{future::Future, path::Path};

use chrono::NaiveDateTime;

use crate::record::{DeleteOutcome, MatchId, MatchRecord, NewMatch, Requester};

/// Abstraction over a match store backend.
///
/// Implementations own the only handle to their storage and must serialise
/// every mutating call; callers share a store by cloning the handle, never by
/// wrapping it in their own lock.
///
/// All methods return `Send` futures so the trait can be used from the
/// multi-threaded tokio runtime the bot runs on.
pub trait MatchStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Validate `input` and append it as a new row. Invalid input is rejected
  /// before anything is written.
  fn insert(
    &self,
    input: NewMatch,
  ) -> impl Future<Output = Result<MatchRecord, Self::Error>> + Send + '_;

  /// Delete one row if `requester` owns it or is an admin. Lookup and delete
  /// happen atomically.
  fn delete_by_id(
    &self,
    id: MatchId,
    requester: Requester,
  ) -> impl Future<Output = Result<DeleteOutcome, Self::Error>> + Send + '_;

  /// Remove every row; returns how many were removed. Authorization is the
  /// caller's job.
  fn delete_all(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Remove every row whose `match_datetime` is strictly before `cutoff`.
  fn purge_before(
    &self,
    cutoff: NaiveDateTime,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Copy the entire store to `path`, creating or overwriting it.
  fn snapshot_to<'a>(
    &'a self,
    path: &'a Path,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn get(
    &self,
    id: MatchId,
  ) -> impl Future<Output = Result<Option<MatchRecord>, Self::Error>> + Send + '_;

  /// Records with `start <= match_datetime <= end`, ordered by time then id.
  fn list_between(
    &self,
    start: NaiveDateTime,
    end: NaiveDateTime,
  ) -> impl Future<Output = Result<Vec<MatchRecord>, Self::Error>> + Send + '_;

  /// Every record, ordered by id.
  fn export_all(
    &self,
  ) -> impl Future<Output = Result<Vec<MatchRecord>, Self::Error>> + Send + '_;

  fn count(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Cheap round trip to the storage layer.
  fn ping(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
