//! The fixed set of teams a match may be logged for.

use serde::{Deserialize, Serialize};

/// Team identifiers a guild role must carry to be accepted as a match's team.
///
/// Matching is by substring so that roles like `White Team` or
/// `Purple (Varsity)` resolve to `White` and `Purple`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRoster(Vec<String>);

impl Default for TeamRoster {
  fn default() -> Self { Self::new(["White", "Purple", "Orange"]) }
}

impl TeamRoster {
  pub fn new<I, S>(teams: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self(teams.into_iter().map(Into::into).collect())
  }

  /// The roster entry `role_name` belongs to, if any.
  pub fn team_for(&self, role_name: &str) -> Option<&str> {
    self
      .0
      .iter()
      .map(String::as_str)
      .find(|team| !team.is_empty() && role_name.contains(team))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_roles_containing_a_team_name() {
    let roster = TeamRoster::default();
    assert_eq!(roster.team_for("White Team"), Some("White"));
    assert_eq!(roster.team_for("Orange"), Some("Orange"));
    assert_eq!(roster.team_for("Purple (Varsity)"), Some("Purple"));
  }

  #[test]
  fn rejects_unrelated_roles() {
    let roster = TeamRoster::default();
    assert_eq!(roster.team_for("Moderator"), None);
    assert_eq!(roster.team_for("white team"), None);
  }

  #[test]
  fn empty_entries_never_match() {
    let roster = TeamRoster::new(["", "Gold"]);
    assert_eq!(roster.team_for("Moderator"), None);
    assert_eq!(roster.team_for("Gold Squad"), Some("Gold"));
  }
}
