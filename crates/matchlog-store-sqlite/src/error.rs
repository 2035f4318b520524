//! Error type for `matchlog-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] matchlog_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// A stored `match_datetime` could not be read back.
  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Error {
  /// Whether this failure belongs to the persistence layer rather than to
  /// the request that triggered it.
  pub fn is_storage_unavailable(&self) -> bool {
    match self {
      Self::Core(inner) => matches!(inner, matchlog_core::Error::StorageUnavailable(_)),
      Self::Database(_) | Self::Io(_) | Self::DateParse(_) => true,
    }
  }
}

impl From<Error> for matchlog_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(inner) => inner,
      other => Self::StorageUnavailable(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
