//! Match records and the input types that produce them.
//!
//! A record is created once and never updated. Validation of user-supplied
//! text happens in [`NewMatch::validate`], before any store touches disk.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned row id. Monotonic and never reused.
pub type MatchId = i64;

/// Opaque id of a chat-platform user.
pub type UserId = u64;

/// The format users type match times in: `month/day/year hour:minute`, 24h.
pub const INPUT_DATETIME_FORMAT: &str = "%m/%d/%Y %H:%M";

/// The canonical, lexically sortable form stored in the `match_datetime`
/// column.
pub const STORED_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ─── Record ──────────────────────────────────────────────────────────────────

/// A persisted match. Field names mirror the table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
  pub id:             MatchId,
  pub team_name:      String,
  pub opponent_name:  String,
  pub league_name:    String,
  /// Naive local time; no timezone handling.
  pub match_datetime: NaiveDateTime,
  pub match_creator:  UserId,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Raw input to [`crate::store::MatchStore::insert`], exactly as the user
/// typed it.
#[derive(Debug, Clone)]
pub struct NewMatch {
  pub team_name:      String,
  pub opponent_name:  String,
  pub league_name:    String,
  /// Unparsed; must match [`INPUT_DATETIME_FORMAT`].
  pub match_datetime: String,
  pub creator:        UserId,
}

/// A [`NewMatch`] that passed validation; ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMatch {
  pub team_name:      String,
  pub opponent_name:  String,
  pub league_name:    String,
  pub match_datetime: NaiveDateTime,
  pub creator:        UserId,
}

impl NewMatch {
  pub fn new(
    team_name: impl Into<String>,
    opponent_name: impl Into<String>,
    league_name: impl Into<String>,
    match_datetime: impl Into<String>,
    creator: UserId,
  ) -> Self {
    Self {
      team_name: team_name.into(),
      opponent_name: opponent_name.into(),
      league_name: league_name.into(),
      match_datetime: match_datetime.into(),
      creator,
    }
  }

  /// Build from separate date (`1/20/2025`) and time (`17:00`) strings, the
  /// way the slash command collects them.
  pub fn from_date_and_time(
    team_name: impl Into<String>,
    opponent_name: impl Into<String>,
    league_name: impl Into<String>,
    date: &str,
    time: &str,
    creator: UserId,
  ) -> Self {
    Self::new(
      team_name,
      opponent_name,
      league_name,
      format!("{} {}", date.trim(), time.trim()),
      creator,
    )
  }

  pub fn validate(self) -> Result<ValidMatch> {
    let match_datetime = parse_match_datetime(&self.match_datetime)?;
    Ok(ValidMatch {
      team_name: validate_text("team_name", &self.team_name)?,
      opponent_name: validate_text("opponent_name", &self.opponent_name)?,
      league_name: validate_text("league_name", &self.league_name)?,
      match_datetime,
      creator: self.creator,
    })
  }
}

impl ValidMatch {
  pub fn into_record(self, id: MatchId) -> MatchRecord {
    MatchRecord {
      id,
      team_name: self.team_name,
      opponent_name: self.opponent_name,
      league_name: self.league_name,
      match_datetime: self.match_datetime,
      match_creator: self.creator,
    }
  }
}

/// Parse user input in [`INPUT_DATETIME_FORMAT`]. Leading zeros are
/// optional for month, day and hour, so `1/5/2025 9:30` is accepted; the
/// year must be exactly four digits.
pub fn parse_match_datetime(input: &str) -> Result<NaiveDateTime> {
  let parsed = NaiveDateTime::parse_from_str(input.trim(), INPUT_DATETIME_FORMAT).map_err(|e| {
    Error::invalid(
      "match_datetime",
      format!("{input:?} is not month/day/year hour:minute ({e})"),
    )
  })?;

  // chrono also takes `25`, `+10000` and `-3` for `%Y`; none of those keep
  // the stored form sortable.
  if !has_four_digit_year(input) {
    return Err(Error::invalid(
      "match_datetime",
      format!("{input:?} must give the year as four digits"),
    ));
  }
  Ok(parsed)
}

fn has_four_digit_year(input: &str) -> bool {
  input
    .split_whitespace()
    .next()
    .and_then(|date| date.rsplit('/').next())
    .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

/// Free text must be non-empty and comma-free; exports are comma-separated.
fn validate_text(field: &'static str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::invalid(field, "must not be empty"));
  }
  if trimmed.contains(',') {
    return Err(Error::invalid(field, "must not contain commas"));
  }
  Ok(trimmed.to_owned())
}

// ─── Deletion ────────────────────────────────────────────────────────────────

/// Who is asking for a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
  pub user_id:  UserId,
  pub is_admin: bool,
}

impl Requester {
  pub fn new(user_id: UserId, is_admin: bool) -> Self { Self { user_id, is_admin } }

  /// Owners and admins may delete; nobody else.
  pub fn may_delete(&self, record: &MatchRecord) -> bool {
    self.is_admin || record.match_creator == self.user_id
  }
}

/// Result of [`crate::store::MatchStore::delete_by_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
  /// The row existed and was removed; carries what was removed.
  Deleted(MatchRecord),
  NotFound,
  /// The row exists but the requester may not remove it. Nothing changed.
  Forbidden,
}

impl DeleteOutcome {
  /// Fold the non-success outcomes into the shared error taxonomy.
  pub fn into_result(self, id: MatchId, requester: Requester) -> Result<MatchRecord> {
    match self {
      Self::Deleted(record) => Ok(record),
      Self::NotFound => Err(Error::NotFound(id)),
      Self::Forbidden => Err(Error::Forbidden { id, requester: requester.user_id }),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
      .unwrap()
      .and_hms_opt(h, min, 0)
      .unwrap()
  }

  #[test]
  fn parses_documented_example() {
    assert_eq!(
      parse_match_datetime("1/20/2025 17:00").unwrap(),
      at(2025, 1, 20, 17, 0)
    );
  }

  #[test]
  fn parses_padded_and_unpadded_fields() {
    assert_eq!(
      parse_match_datetime("01/05/2025 09:30").unwrap(),
      parse_match_datetime("1/5/2025 9:30").unwrap()
    );
  }

  #[test]
  fn rejects_malformed_datetimes() {
    for bad in [
      "",
      "2025-01-20 17:00",
      "1/20/2025",
      "13/01/2025 10:00",
      "2/30/2025 10:00",
      "1/20/2025 25:00",
      "1/20/2025 5pm",
      "1/20/25 17:00",
      "1/20/+10000 17:00",
      "1/20/-3 17:00",
      "1/20/+2025 17:00",
      "1/20/02025 17:00",
    ] {
      let err = parse_match_datetime(bad).unwrap_err();
      assert!(
        matches!(err, Error::InvalidFormat { field: "match_datetime", .. }),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn four_digit_years_keep_stored_order() {
    let early = parse_match_datetime("1/20/0999 17:00").unwrap();
    let late = parse_match_datetime("1/20/9999 17:00").unwrap();
    let stored = |dt: NaiveDateTime| dt.format(STORED_DATETIME_FORMAT).to_string();

    assert!(stored(early) < stored(late));
    assert_eq!(stored(early), "0999-01-20T17:00:00");
  }

  #[test]
  fn short_year_never_validates() {
    let err = NewMatch::new("White", "Riverside", "Spring", "1/20/25 17:00", 1)
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::InvalidFormat { field: "match_datetime", .. }));
  }

  #[test]
  fn validate_trims_and_keeps_fields() {
    let valid = NewMatch::from_date_and_time(
      " White ", "Riverside", "Spring", "1/20/2025", " 17:00", 42,
    )
    .validate()
    .unwrap();

    assert_eq!(valid.team_name, "White");
    assert_eq!(valid.opponent_name, "Riverside");
    assert_eq!(valid.league_name, "Spring");
    assert_eq!(valid.match_datetime, at(2025, 1, 20, 17, 0));
    assert_eq!(valid.creator, 42);
  }

  #[test]
  fn validate_rejects_commas_and_empty_text() {
    let comma = NewMatch::new("White", "River, side", "Spring", "1/20/2025 17:00", 1);
    assert!(matches!(
      comma.validate().unwrap_err(),
      Error::InvalidFormat { field: "opponent_name", .. }
    ));

    let empty = NewMatch::new("White", "Riverside", "   ", "1/20/2025 17:00", 1);
    assert!(matches!(
      empty.validate().unwrap_err(),
      Error::InvalidFormat { field: "league_name", .. }
    ));
  }

  #[test]
  fn past_datetimes_are_accepted() {
    assert!(NewMatch::new("White", "Riverside", "Spring", "3/1/1999 08:00", 1)
      .validate()
      .is_ok());
  }

  #[test]
  fn owner_and_admin_may_delete() {
    let record = NewMatch::new("White", "Riverside", "Spring", "1/20/2025 17:00", 42)
      .validate()
      .unwrap()
      .into_record(1);

    assert!(Requester::new(42, false).may_delete(&record));
    assert!(Requester::new(99, true).may_delete(&record));
    assert!(!Requester::new(99, false).may_delete(&record));
  }

  #[test]
  fn outcome_maps_onto_error_taxonomy() {
    let requester = Requester::new(7, false);
    assert!(matches!(
      DeleteOutcome::NotFound.into_result(3, requester),
      Err(Error::NotFound(3))
    ));
    assert!(matches!(
      DeleteOutcome::Forbidden.into_result(3, requester),
      Err(Error::Forbidden { id: 3, requester: 7 })
    ));
  }
}
