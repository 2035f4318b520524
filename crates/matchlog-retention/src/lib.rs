//! Retention sweeper for the matchlog store.
//!
//! On every tick the sweeper checks whether today is a cutover date. If it
//! is, matches older than the retention horizon are purged and the store is
//! snapshotted to a backup file. Any [`MatchStore`](matchlog_core::store::MatchStore)
//! backend works.

mod sweeper;

pub mod error;

pub use error::Error;
pub use sweeper::{DEFAULT_SWEEP_INTERVAL, SweepOutcome, Sweeper, SweeperHandle};

#[cfg(test)]
mod tests;
