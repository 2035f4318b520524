//! [`Sweeper`]: periodic purge and snapshot of a [`MatchStore`].

use std::{path::PathBuf, time::Duration};

use chrono::{Local, NaiveDate, NaiveDateTime};
use matchlog_core::{retention::RetentionPolicy, store::MatchStore};
use tokio::{
  sync::watch,
  task::JoinHandle,
  time::{self, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::Error;

/// How often the gate is re-evaluated unless configured otherwise.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(12 * 60 * 60);

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
  /// `today` is not a cutover date; the store was not touched.
  Skipped { today: NaiveDate },
  Completed {
    purged: usize,
    cutoff: NaiveDateTime,
    backup: PathBuf,
  },
}

/// Recurring retention job over a store handle.
///
/// Each tick runs `CheckGate → Purging → Snapshotting`, stopping after the
/// gate when today is not a cutover date. No state carries over between
/// ticks, so a tick that fails halfway is simply redone by the next one.
pub struct Sweeper<S> {
  store:       S,
  policy:      RetentionPolicy,
  backup_path: PathBuf,
  interval:    Duration,
}

impl<S: MatchStore> Sweeper<S> {
  pub fn new(store: S, policy: RetentionPolicy, backup_path: impl Into<PathBuf>) -> Self {
    Self {
      store,
      policy,
      backup_path: backup_path.into(),
      interval: DEFAULT_SWEEP_INTERVAL,
    }
  }

  pub fn with_interval(mut self, interval: Duration) -> Self {
    self.interval = interval;
    self
  }

  /// Run one tick as if the clock read `now` (naive local time).
  ///
  /// A failed purge aborts before the snapshot. Running twice on the same
  /// cutover day purges nothing the second time and rewrites an equivalent
  /// backup.
  pub async fn run_once(&self, now: NaiveDateTime) -> Result<SweepOutcome, Error<S::Error>> {
    let today = now.date();
    if !self.policy.is_cutover(today) {
      return Ok(SweepOutcome::Skipped { today });
    }

    let cutoff = self.policy.cutoff(now);
    let purged = self
      .store
      .purge_before(cutoff)
      .await
      .map_err(Error::Purge)?;

    self
      .store
      .snapshot_to(&self.backup_path)
      .await
      .map_err(Error::Snapshot)?;

    Ok(SweepOutcome::Completed {
      purged,
      cutoff,
      backup: self.backup_path.clone(),
    })
  }

  /// One scheduled tick against the wall clock. Failures are logged, never
  /// propagated.
  async fn tick(&self) {
    match self.run_once(Local::now().naive_local()).await {
      Ok(SweepOutcome::Skipped { today }) => {
        debug!(%today, "not a cutover date; sweep skipped");
      }
      Ok(SweepOutcome::Completed { purged, cutoff, backup }) => {
        info!(purged, %cutoff, backup = %backup.display(), "retention sweep completed");
      }
      Err(e) => {
        error!(error = %e, "retention sweep failed; retrying next tick");
      }
    }
  }
}

impl<S> Sweeper<S>
where
  S: MatchStore + 'static,
{
  /// Start ticking on the current tokio runtime. The first tick fires
  /// immediately.
  ///
  /// Dropping the returned handle stops the sweeper as well.
  pub fn spawn(self) -> SweeperHandle {
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let period = self.interval.max(Duration::from_millis(1));

    info!(
      interval_secs = period.as_secs(),
      horizon_days = self.policy.horizon_days,
      backup = %self.backup_path.display(),
      "retention sweeper started"
    );

    let task = tokio::spawn(async move {
      let mut interval = time::interval(period);
      interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

      loop {
        tokio::select! {
          _ = interval.tick() => self.tick().await,
          _ = stop_rx.changed() => break,
        }
      }
      info!("retention sweeper stopped");
    });

    SweeperHandle { stop: stop_tx, task }
  }
}

/// Handle to a spawned [`Sweeper`].
pub struct SweeperHandle {
  stop: watch::Sender<bool>,
  task: JoinHandle<()>,
}

impl SweeperHandle {
  /// Stop future ticks and wait for the task to exit. A sweep already in
  /// progress runs to completion first.
  pub async fn shutdown(self) {
    let _ = self.stop.send(true);
    if let Err(e) = self.task.await {
      warn!(error = %e, "retention sweeper task ended abnormally");
    }
  }

  pub fn is_finished(&self) -> bool { self.task.is_finished() }
}
