//! Error types for `matchlog-core`.

use thiserror::Error;

use crate::record::{MatchId, UserId};

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed timestamp or disallowed text in a free-text field. Always
  /// raised before anything is written.
  #[error("invalid {field}: {reason}")]
  InvalidFormat { field: &'static str, reason: String },

  #[error("match not found: {0}")]
  NotFound(MatchId),

  #[error("user {requester} may not delete match {id}")]
  Forbidden { id: MatchId, requester: UserId },

  #[error("storage unavailable: {0}")]
  StorageUnavailable(String),
}

impl Error {
  pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidFormat { field, reason: reason.into() }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
