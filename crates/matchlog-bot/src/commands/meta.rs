use matchlog_core::store::MatchStore as _;

use crate::{AppError, AppVars, Context, util::ContextExtras as _};

async fn check_store_ok(vars: &AppVars) -> Result<usize, AppError> {
  vars.store.ping().await?;
  Ok(vars.store.count().await?)
}

/// Check the bot is alive and the match store answers
#[poise::command(slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), AppError> {
  let ping_num = ctx.ping().await.as_millis();

  ctx
    .reply_ephemeral(format!(
      "{}\n\n{}",
      match ping_num {
        0 => String::from("ok, waiting for more data to report ping"),
        _ => format!("hi, heartbeat is pinging in {ping_num} ms"),
      },
      match check_store_ok(ctx.data()).await {
        Ok(n) => format!("match store ok, {n} matches logged"),
        Err(err) => format!("match store not ok: {err}"),
      },
    ))
    .await?;
  Ok(())
}
