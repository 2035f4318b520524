//! Retention policy: when the sweeper may run and what it may delete.
//!
//! Pure date arithmetic only; the sweeper crate owns scheduling and I/O.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_HORIZON_DAYS: u32 = 180;

/// Upper bound accepted by [`RetentionPolicy::validate`]: one hundred years.
pub const MAX_HORIZON_DAYS: u32 = 36_525;

/// A calendar date, recurring every year, on which a sweep may run.
///
/// Leaving `day` unset means "last day of `month`", resolved per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutoverDate {
  pub month: u32,
  #[serde(default)]
  pub day:   Option<u32>,
}

impl CutoverDate {
  pub const fn last_day_of(month: u32) -> Self { Self { month, day: None } }

  pub const fn on(month: u32, day: u32) -> Self { Self { month, day: Some(day) } }

  /// The concrete date in `year`, or `None` if it does not exist that year
  /// (e.g. February 29th outside leap years).
  pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
    match self.day {
      Some(day) => NaiveDate::from_ymd_opt(year, self.month, day),
      None => last_day_of_month(year, self.month),
    }
  }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
  if !(1..=12).contains(&month) {
    return None;
  }
  let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
  NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Horizon and cutover dates for the retention sweeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
  /// Records older than this many days are purged on a cutover date.
  #[serde(default = "default_horizon_days")]
  pub horizon_days: u32,
  #[serde(default = "default_cutover")]
  pub cutover:      Vec<CutoverDate>,
}

fn default_horizon_days() -> u32 { DEFAULT_HORIZON_DAYS }

fn default_cutover() -> Vec<CutoverDate> {
  vec![CutoverDate::last_day_of(6), CutoverDate::last_day_of(12)]
}

impl Default for RetentionPolicy {
  fn default() -> Self {
    Self { horizon_days: default_horizon_days(), cutover: default_cutover() }
  }
}

impl RetentionPolicy {
  /// Reject cutover dates that can never occur, a zero horizon (which
  /// would purge everything up to the current minute) and horizons longer
  /// than [`MAX_HORIZON_DAYS`].
  pub fn validate(&self) -> Result<()> {
    if !(1..=MAX_HORIZON_DAYS).contains(&self.horizon_days) {
      return Err(Error::InvalidFormat {
        field:  "horizon_days",
        reason: format!("must be between 1 and {MAX_HORIZON_DAYS} days"),
      });
    }
    // 2000 is a leap year, so every date that exists in some year exists here.
    if let Some(bad) = self.cutover.iter().find(|c| c.in_year(2000).is_none()) {
      return Err(Error::InvalidFormat {
        field:  "cutover",
        reason: format!("month {} day {:?} is not a calendar date", bad.month, bad.day),
      });
    }
    Ok(())
  }

  /// Whether `today` is one of this year's cutover dates.
  pub fn is_cutover(&self, today: NaiveDate) -> bool {
    self
      .cutover
      .iter()
      .filter_map(|c| c.in_year(today.year()))
      .any(|date| date == today)
  }

  pub fn horizon(&self) -> TimeDelta { TimeDelta::days(i64::from(self.horizon_days)) }

  /// Records strictly before the returned instant are eligible for purge.
  ///
  /// A horizon reaching past the earliest representable date yields
  /// [`NaiveDateTime::MIN`], so nothing is eligible.
  pub fn cutoff(&self, now: NaiveDateTime) -> NaiveDateTime {
    now
      .checked_sub_signed(self.horizon())
      .unwrap_or(NaiveDateTime::MIN)
  }
}
