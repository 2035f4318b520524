//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored in [`STORED_DATETIME_FORMAT`], which sorts lexically
//! in time order, so range queries compare text directly. User ids are
//! stored as `INTEGER`; snowflake ids fit in 63 bits.

use chrono::NaiveDateTime;
use matchlog_core::record::{MatchRecord, STORED_DATETIME_FORMAT, UserId};

use crate::{Error, Result};

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String { dt.format(STORED_DATETIME_FORMAT).to_string() }

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, STORED_DATETIME_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── UserId ──────────────────────────────────────────────────────────────────

pub fn encode_user(id: UserId) -> i64 { id as i64 }

pub fn decode_user(id: i64) -> UserId { id as u64 }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawMatch::from_row`]; keep the two in sync.
pub const MATCH_COLUMNS: &str =
  "id, team_name, opponent_name, league_name, match_datetime, match_creator";

/// Values read directly from a `matches` row.
pub struct RawMatch {
  pub id:             i64,
  pub team_name:      String,
  pub opponent_name:  String,
  pub league_name:    String,
  pub match_datetime: String,
  pub match_creator:  i64,
}

impl RawMatch {
  /// The one place rows are read by position.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      team_name:      row.get(1)?,
      opponent_name:  row.get(2)?,
      league_name:    row.get(3)?,
      match_datetime: row.get(4)?,
      match_creator:  row.get(5)?,
    })
  }

  pub fn into_record(self) -> Result<MatchRecord> {
    Ok(MatchRecord {
      id:             self.id,
      team_name:      self.team_name,
      opponent_name:  self.opponent_name,
      league_name:    self.league_name,
      match_datetime: decode_dt(&self.match_datetime)?,
      match_creator:  decode_user(self.match_creator),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stored_datetimes_sort_in_time_order() {
    let earlier = NaiveDateTime::parse_from_str("2025-01-09 23:00", "%Y-%m-%d %H:%M").unwrap();
    let later = NaiveDateTime::parse_from_str("2025-01-10 08:00", "%Y-%m-%d %H:%M").unwrap();
    assert!(encode_dt(earlier) < encode_dt(later));
    assert_eq!(encode_dt(later), "2025-01-10T08:00:00");
    assert_eq!(decode_dt(&encode_dt(later)).unwrap(), later);
  }

  #[test]
  fn snowflake_ids_survive_the_integer_column() {
    let id: UserId = 1_336_510_972_403_126_292;
    assert_eq!(decode_user(encode_user(id)), id);
  }

  #[test]
  fn garbage_datetime_is_a_parse_error() {
    assert!(matches!(decode_dt("next tuesday"), Err(Error::DateParse(_))));
  }
}
