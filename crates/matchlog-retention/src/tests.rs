//! Sweeper tests against in-memory SQLite stores.

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
  time::Duration,
};

use chrono::{NaiveDate, NaiveDateTime};
use matchlog_core::{
  record::{DeleteOutcome, MatchId, MatchRecord, NewMatch, Requester},
  retention::{CutoverDate, RetentionPolicy},
  store::MatchStore,
};
use matchlog_store_sqlite::SqliteStore;

use crate::{Error, SweepOutcome, Sweeper};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(y, m, d)
    .unwrap()
    .and_hms_opt(h, 0, 0)
    .unwrap()
}

/// Store with one match on each side of the default horizon as seen from
/// noon on 2025-06-30 (cutoff 2025-01-01 12:00).
async fn seeded_store() -> SqliteStore {
  let store = SqliteStore::open_in_memory().await.unwrap();
  for (opponent, when) in [
    ("Old", "12/31/2024 18:00"),
    ("Older", "6/1/2024 18:00"),
    ("Recent", "1/5/2025 09:00"),
    ("Upcoming", "7/4/2025 19:00"),
  ] {
    store
      .insert(NewMatch::new("White", opponent, "Spring", when, 1))
      .await
      .unwrap();
  }
  store
}

#[tokio::test]
async fn non_cutover_day_is_a_no_op() {
  let store = seeded_store().await;
  let dir = tempfile::tempdir().unwrap();
  let backup = dir.path().join("backup.db");
  let sweeper = Sweeper::new(store.clone(), RetentionPolicy::default(), &backup);

  let outcome = sweeper.run_once(at(2025, 6, 29, 12)).await.unwrap();

  assert_eq!(
    outcome,
    SweepOutcome::Skipped { today: NaiveDate::from_ymd_opt(2025, 6, 29).unwrap() }
  );
  assert_eq!(store.count().await.unwrap(), 4);
  assert!(!backup.exists());
}

#[tokio::test]
async fn cutover_day_purges_and_snapshots() {
  let store = seeded_store().await;
  let dir = tempfile::tempdir().unwrap();
  let backup = dir.path().join("backup.db");
  let sweeper = Sweeper::new(store.clone(), RetentionPolicy::default(), &backup);

  let outcome = sweeper.run_once(at(2025, 6, 30, 12)).await.unwrap();

  assert_eq!(
    outcome,
    SweepOutcome::Completed {
      purged: 2,
      cutoff: at(2025, 1, 1, 12),
      backup: backup.clone(),
    }
  );

  let remaining = store.export_all().await.unwrap();
  let names: Vec<_> = remaining.iter().map(|m| m.opponent_name.as_str()).collect();
  assert_eq!(names, ["Recent", "Upcoming"]);

  let copy = SqliteStore::open(&backup).await.unwrap();
  assert_eq!(copy.export_all().await.unwrap(), remaining);
}

#[tokio::test]
async fn repeated_sweeps_on_the_same_day_are_idempotent() {
  let store = seeded_store().await;
  let dir = tempfile::tempdir().unwrap();
  let backup = dir.path().join("backup.db");
  let sweeper = Sweeper::new(store.clone(), RetentionPolicy::default(), &backup);

  sweeper.run_once(at(2025, 12, 31, 1)).await.unwrap();
  let after_first = store.export_all().await.unwrap();

  let second = sweeper.run_once(at(2025, 12, 31, 13)).await.unwrap();
  assert!(matches!(second, SweepOutcome::Completed { purged: 0, .. }));
  assert_eq!(store.export_all().await.unwrap(), after_first);

  let copy = SqliteStore::open(&backup).await.unwrap();
  assert_eq!(copy.export_all().await.unwrap(), after_first);
}

#[tokio::test]
async fn custom_horizon_and_cutover_are_honoured() {
  let store = seeded_store().await;
  let dir = tempfile::tempdir().unwrap();
  let policy = RetentionPolicy {
    horizon_days: 30,
    cutover:      vec![CutoverDate::on(3, 1)],
  };
  let sweeper = Sweeper::new(store.clone(), policy, dir.path().join("b.db"));

  assert!(matches!(
    sweeper.run_once(at(2025, 6, 30, 12)).await.unwrap(),
    SweepOutcome::Skipped { .. }
  ));

  // Cutoff 2025-01-30 00:00 removes everything except the July match.
  let outcome = sweeper.run_once(at(2025, 3, 1, 0)).await.unwrap();
  assert!(matches!(outcome, SweepOutcome::Completed { purged: 3, .. }));
  assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn unvalidated_huge_horizon_purges_nothing() {
  let store = seeded_store().await;
  let dir = tempfile::tempdir().unwrap();
  let policy = RetentionPolicy { horizon_days: u32::MAX, ..Default::default() };
  let sweeper = Sweeper::new(store.clone(), policy, dir.path().join("b.db"));

  let outcome = sweeper.run_once(at(2025, 6, 30, 12)).await.unwrap();

  assert!(matches!(
    outcome,
    SweepOutcome::Completed { purged: 0, cutoff, .. } if cutoff == NaiveDateTime::MIN
  ));
  assert_eq!(store.count().await.unwrap(), 4);
}

// ─── Failure handling ────────────────────────────────────────────────────────

/// Delegates to SQLite but fails every purge.
#[derive(Clone)]
struct BrokenPurgeStore {
  inner:          SqliteStore,
  snapshot_taken: Arc<AtomicBool>,
}

type StoreError = matchlog_store_sqlite::Error;

impl MatchStore for BrokenPurgeStore {
  type Error = StoreError;

  async fn insert(&self, input: NewMatch) -> Result<MatchRecord, StoreError> {
    self.inner.insert(input).await
  }

  async fn delete_by_id(
    &self,
    id: MatchId,
    requester: Requester,
  ) -> Result<DeleteOutcome, StoreError> {
    self.inner.delete_by_id(id, requester).await
  }

  async fn delete_all(&self) -> Result<usize, StoreError> { self.inner.delete_all().await }

  async fn purge_before(&self, _cutoff: NaiveDateTime) -> Result<usize, StoreError> {
    Err(StoreError::Io(std::io::Error::other("disk unavailable")))
  }

  async fn snapshot_to<'a>(&'a self, path: &'a Path) -> Result<(), StoreError> {
    self.snapshot_taken.store(true, Ordering::SeqCst);
    self.inner.snapshot_to(path).await
  }

  async fn get(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
    self.inner.get(id).await
  }

  async fn list_between(
    &self,
    start: NaiveDateTime,
    end: NaiveDateTime,
  ) -> Result<Vec<MatchRecord>, StoreError> {
    self.inner.list_between(start, end).await
  }

  async fn export_all(&self) -> Result<Vec<MatchRecord>, StoreError> {
    self.inner.export_all().await
  }

  async fn count(&self) -> Result<usize, StoreError> { self.inner.count().await }

  async fn ping(&self) -> Result<(), StoreError> { self.inner.ping().await }
}

#[tokio::test]
async fn failed_purge_skips_snapshot() {
  let store = BrokenPurgeStore {
    inner:          seeded_store().await,
    snapshot_taken: Arc::new(AtomicBool::new(false)),
  };
  let dir = tempfile::tempdir().unwrap();
  let backup = dir.path().join("backup.db");
  let sweeper = Sweeper::new(store.clone(), RetentionPolicy::default(), &backup);

  let err = sweeper.run_once(at(2025, 6, 30, 12)).await.unwrap_err();

  assert!(matches!(err, Error::Purge(ref e) if e.is_storage_unavailable()));
  assert!(!store.snapshot_taken.load(Ordering::SeqCst));
  assert!(!backup.exists());
  assert_eq!(store.count().await.unwrap(), 4);
}

// ─── Scheduling ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn spawned_sweeper_stops_on_shutdown() {
  let store = seeded_store().await;
  let dir = tempfile::tempdir().unwrap();
  let policy = RetentionPolicy { cutover: Vec::new(), ..Default::default() };

  let handle = Sweeper::new(store.clone(), policy, dir.path().join("b.db"))
    .with_interval(Duration::from_millis(10))
    .spawn();

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(!handle.is_finished());

  tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
    .await
    .expect("sweeper should stop promptly");

  // No cutover dates configured, so nothing may have been touched.
  assert_eq!(store.count().await.unwrap(), 4);
  assert!(!dir.path().join("b.db").exists());
}
