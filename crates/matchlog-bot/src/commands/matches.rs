//! `/log_match`, `/del_match`, `/show_match`, `/clear_matches` and
//! `/export_matches`.

use chrono::{Local, NaiveDateTime, TimeDelta};
use matchlog_core::{
  Error as CoreError,
  record::{MatchId, NewMatch, Requester, UserId, parse_match_datetime},
  store::MatchStore as _,
};
use poise::CreateReply;
use serenity::all::{CreateAttachment, CreateEmbed, Role};
use tracing::{info, warn};

use crate::{AppError, AppVars, Context, render, util::ContextExtras as _};

pub const BAD_DATETIME: &str =
  "Bad date or time format. Use the proper formatting, EX: 1/20/2025 and 17:00";
pub const INVALID_ROLE: &str = "Invalid role. Please select a team role only";
pub const NOT_YOUR_MATCH: &str = "You cannot delete a match you did not create";

const EXPORT_FILENAME: &str = "matches.csv";

// ─── Handlers ────────────────────────────────────────────────────────────────

/// Validate and store a match. User mistakes come back as the reply text;
/// only storage failures are errors.
pub async fn handle_log_match(
  vars: &AppVars,
  role_name: &str,
  opponent: &str,
  league: &str,
  date: &str,
  time: &str,
  creator: UserId,
) -> Result<String, AppError> {
  let input = NewMatch::from_date_and_time(role_name, opponent, league, date, time, creator);

  if parse_match_datetime(&input.match_datetime).is_err() {
    warn!(creator, date, time, "rejected match date/time");
    return Ok(BAD_DATETIME.into());
  }

  let Some(team) = vars.teams.team_for(role_name) else {
    warn!(creator, role = role_name, "rejected non-team role");
    return Ok(INVALID_ROLE.into());
  };
  let input = NewMatch { team_name: team.to_owned(), ..input };

  match vars.store.insert(input).await.map_err(CoreError::from) {
    Ok(record) => {
      info!(id = record.id, team = %record.team_name, creator, "match logged");
      Ok(render::logged_reply(&record))
    }
    Err(CoreError::InvalidFormat { field, reason }) => {
      warn!(creator, field, %reason, "rejected match text");
      Ok(format!("Invalid {}: {reason}", field.replace('_', " ")))
    }
    Err(e) => Err(e.into()),
  }
}

pub async fn handle_del_match(
  vars: &AppVars,
  id: MatchId,
  requester: Requester,
) -> Result<String, AppError> {
  let outcome = vars.store.delete_by_id(id, requester).await?;

  match outcome.into_result(id, requester) {
    Ok(record) => {
      info!(id, requester = requester.user_id, creator = record.match_creator, "match deleted");
      Ok(format!("Match with id {id} deleted"))
    }
    Err(CoreError::NotFound(_)) => Ok(format!("No match with id {id} exists")),
    Err(CoreError::Forbidden { .. }) => {
      warn!(id, requester = requester.user_id, "refused delete of another user's match");
      Ok(NOT_YOUR_MATCH.into())
    }
    Err(e) => Err(e.into()),
  }
}

/// Title and body of the digest for the seven days starting at `now`.
pub async fn handle_show_match(
  vars: &AppVars,
  now: NaiveDateTime,
) -> Result<(String, String), AppError> {
  let upcoming = vars
    .store
    .list_between(now, now + TimeDelta::weeks(1))
    .await?;

  Ok((render::digest_title(now.date()), render::digest_body(&upcoming)))
}

pub async fn handle_clear_matches(vars: &AppVars) -> Result<usize, AppError> {
  Ok(vars.store.delete_all().await?)
}

/// Number of exported records and the CSV text.
pub async fn handle_export_matches(vars: &AppVars) -> Result<(usize, String), AppError> {
  let records = vars.store.export_all().await?;
  let csv = render::export_csv(&records)?;
  Ok((records.len(), csv))
}

// ─── Commands ────────────────────────────────────────────────────────────────

async fn author_is_admin(ctx: Context<'_>) -> bool {
  ctx
    .author_member()
    .await
    .is_some_and(|member| member.permissions.is_some_and(|p| p.administrator()))
}

/// Log an upcoming match. Date as month/day/year, time as hour:minute (24h)
#[poise::command(slash_command, guild_only)]
pub async fn log_match(
  ctx: Context<'_>,
  #[description = "Your team's role"] team: Role,
  #[description = "Who you are playing against"] opponent: String,
  #[description = "The league the match is part of"] league: String,
  #[description = "Match date, e.g. 1/20/2025"] date: String,
  #[description = "Match time (24h), e.g. 17:00"] time: String,
) -> Result<(), AppError> {
  let resp = handle_log_match(
    ctx.data(),
    &team.name,
    &opponent,
    &league,
    &date,
    &time,
    ctx.author().id.get(),
  )
  .await?;
  ctx.say(resp).await?;
  Ok(())
}

/// Delete a logged match you created
#[poise::command(slash_command, guild_only)]
pub async fn del_match(
  ctx: Context<'_>,
  #[description = "The id shown in /show_match"] match_id: MatchId,
) -> Result<(), AppError> {
  let requester = Requester::new(ctx.author().id.get(), author_is_admin(ctx).await);
  let resp = handle_del_match(ctx.data(), match_id, requester).await?;
  ctx.reply_ephemeral(resp).await?;
  Ok(())
}

/// Show the matches scheduled for the next seven days
#[poise::command(slash_command)]
pub async fn show_match(ctx: Context<'_>) -> Result<(), AppError> {
  let (title, body) = handle_show_match(ctx.data(), Local::now().naive_local()).await?;

  ctx
    .send(
      CreateReply::default().embed(
        CreateEmbed::new()
          .title(title)
          .description(body)
          .colour(render::DIGEST_COLOUR),
      ),
    )
    .await?;
  Ok(())
}

/// Remove every logged match
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn clear_matches(ctx: Context<'_>) -> Result<(), AppError> {
  let removed = handle_clear_matches(ctx.data()).await?;
  let author = ctx.author().id;
  info!(removed, user = %author, "match store cleared");

  ctx
    .reply_ephemeral(format!("Matches cleared ({removed} removed)"))
    .await?;

  if let Some(channel) = ctx.data().log_channel {
    let notice = render::clear_notice(author.get(), Local::now().naive_local());
    if let Err(e) = channel.say(ctx.http(), notice).await {
      warn!(error = %e, %channel, "could not post clear notice to log channel");
    }
  }
  Ok(())
}

/// Download every logged match as CSV
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn export_matches(ctx: Context<'_>) -> Result<(), AppError> {
  ctx.defer_ephemeral().await?;
  let (count, csv) = handle_export_matches(ctx.data()).await?;

  ctx
    .send(
      CreateReply::default()
        .content(format!("Exported {count} matches"))
        .attachment(CreateAttachment::bytes(csv.into_bytes(), EXPORT_FILENAME))
        .ephemeral(true),
    )
    .await?;
  Ok(())
}
