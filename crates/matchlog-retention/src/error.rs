//! Error type for `matchlog-retention`.

use thiserror::Error;

/// A failed sweep. `E` is the store backend's error type.
#[derive(Debug, Error)]
pub enum Error<E> {
  /// Nothing was snapshotted; the next tick retries from scratch.
  #[error("purge failed: {0}")]
  Purge(#[source] E),

  /// The purge committed but the backup file may be stale or missing.
  #[error("snapshot failed: {0}")]
  Snapshot(#[source] E),
}
