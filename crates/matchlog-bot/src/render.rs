//! Plain-text rendering of store results for Discord replies and exports.

use chrono::{NaiveDate, NaiveDateTime};
use matchlog_core::record::{MatchRecord, STORED_DATETIME_FORMAT, UserId};
use serde::Serialize;

pub const DIGEST_COLOUR: u32 = 0xeb6106;

pub const CSV_HEADER: [&str; 6] = [
  "id",
  "team_name",
  "opponent_name",
  "league_name",
  "match_datetime",
  "match_creator",
];

// ─── Replies ─────────────────────────────────────────────────────────────────

pub fn logged_reply(record: &MatchRecord) -> String {
  format!(
    "Match logged. Your match is {} against {} in {} on {} at {}.",
    record.team_name,
    record.opponent_name,
    record.league_name,
    record.match_datetime.format("%-m/%-d/%Y"),
    record.match_datetime.format("%H:%M"),
  )
}

pub fn clear_notice(user: UserId, at: NaiveDateTime) -> String {
  format!("Match DB cleared by <@{user}> on {}", at.format(STORED_DATETIME_FORMAT))
}

// ─── Weekly digest ───────────────────────────────────────────────────────────

pub fn digest_title(today: NaiveDate) -> String {
  format!("Matches for the week of {}", today.format("%B %d, %Y"))
}

pub fn digest_line(record: &MatchRecord) -> String {
  format!(
    "`#{}` {} vs. {} ({}) at {}",
    record.id,
    record.team_name,
    record.opponent_name,
    record.league_name,
    record.match_datetime.format("%m/%d/%Y on %H:%M"),
  )
}

/// Discord's cap on an embed description, in characters.
pub const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Embed body: an intro line followed by one line per match. Lines that
/// would push the body past [`EMBED_DESCRIPTION_LIMIT`] are replaced by a
/// single "…and N more" line.
pub fn digest_body(records: &[MatchRecord]) -> String {
  if records.is_empty() {
    return String::from("No matches are scheduled for the next seven days.");
  }

  let mut body = String::from("Here's the matches of this week!\n");
  let mut len = body.chars().count();

  for (shown, record) in records.iter().enumerate() {
    let line = digest_line(record);
    let left_after = records.len() - shown - 1;
    // Keep room for the overflow line that would follow this one.
    let reserve = match left_after {
      0 => 0,
      n => 1 + overflow_line(n).chars().count(),
    };

    let line_len = line.chars().count();
    if len + 1 + line_len + reserve > EMBED_DESCRIPTION_LIMIT {
      body.push('\n');
      body.push_str(&overflow_line(records.len() - shown));
      return body;
    }

    body.push('\n');
    body.push_str(&line);
    len += 1 + line_len;
  }
  body
}

fn overflow_line(hidden: usize) -> String { format!("…and {hidden} more") }

// ─── CSV export ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CsvRow<'a> {
  id:             i64,
  team_name:      &'a str,
  opponent_name:  &'a str,
  league_name:    &'a str,
  match_datetime: String,
  match_creator:  UserId,
}

impl<'a> From<&'a MatchRecord> for CsvRow<'a> {
  fn from(record: &'a MatchRecord) -> Self {
    Self {
      id:             record.id,
      team_name:      &record.team_name,
      opponent_name:  &record.opponent_name,
      league_name:    &record.league_name,
      match_datetime: record.match_datetime.format(STORED_DATETIME_FORMAT).to_string(),
      match_creator:  record.match_creator,
    }
  }
}

/// Header row plus one row per record, in the order given.
pub fn export_csv(records: &[MatchRecord]) -> anyhow::Result<String> {
  let mut wtr = csv::WriterBuilder::new()
    .has_headers(false)
    .from_writer(vec![]);

  wtr.write_record(CSV_HEADER)?;
  for record in records {
    wtr.serialize(CsvRow::from(record))?;
  }

  let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
  Ok(String::from_utf8(bytes)?)
}
