//! poise framework wiring: command list, error handler, registration.

use poise::{BoxFuture, Command, Framework, FrameworkError, FrameworkOptions};
use serenity::{
  FutureExt as _,
  all::{Context as SerenityContext, GuildId},
};
use tracing::{error, info};

use crate::{
  AppError, AppVars,
  commands::{matches, meta},
  util::ContextExtras as _,
};

pub fn bot_commands() -> Vec<Command<AppVars, AppError>> {
  vec![
    matches::log_match(),
    matches::del_match(),
    matches::show_match(),
    matches::clear_matches(),
    matches::export_matches(),
    meta::ping(),
  ]
}

fn handle_framework_error(error: FrameworkError<'_, AppVars, AppError>) -> BoxFuture<'_, ()> {
  async move {
    error!(%error, "command failed");

    let Some(ctx) = error.ctx() else { return };
    if let Err(e) = ctx.reply_ephemeral("An unexpected error occurred").await {
      error!(error = %e, "could not report error to Discord");
    }
  }
  .boxed()
}

pub fn create_framework_options() -> FrameworkOptions<AppVars, AppError> {
  FrameworkOptions {
    on_error: handle_framework_error,
    commands: bot_commands(),
    ..Default::default()
  }
}

/// Register every command globally, or only in `guilds` when any are given.
pub async fn register_commands(
  ctx: &SerenityContext,
  framework: &Framework<AppVars, AppError>,
  guilds: &[GuildId],
) -> Result<(), AppError> {
  let commands = &framework.options().commands;

  if guilds.is_empty() {
    poise::builtins::register_globally(ctx, commands).await?;
    info!(commands = commands.len(), "registered commands globally");
  } else {
    for guild in guilds {
      poise::builtins::register_in_guild(ctx, commands, *guild).await?;
    }
    info!(commands = commands.len(), guilds = guilds.len(), "registered commands in guilds");
  }

  Ok(())
}

pub fn build_framework(vars: AppVars) -> Framework<AppVars, AppError> {
  Framework::builder()
    .options(create_framework_options())
    .setup(move |ctx, ready, framework| {
      Box::pin(async move {
        info!(user = %ready.user.name, "connected to Discord");
        register_commands(ctx, framework, &vars.guilds).await?;
        Ok(vars)
      })
    })
    .build()
}
