//! Discord front end for the matchlog match store.
//!
//! Slash commands are thin wrappers around `handle_*` functions that take
//! [`AppVars`] directly, so the command logic can be exercised without a
//! gateway connection.

pub mod commands;
pub mod config;
pub mod render;
pub mod setup;
mod util;

use matchlog_core::team::TeamRoster;
use matchlog_store_sqlite::SqliteStore;
use serenity::all::{ChannelId, GuildId};

pub use config::BotConfig;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state handed to every command through poise's user data.
pub struct AppVars {
  pub store:       SqliteStore,
  pub teams:       TeamRoster,
  /// Where administrative actions are announced.
  pub log_channel: Option<ChannelId>,
  /// Guilds to register commands in; empty means register globally.
  pub guilds:      Vec<GuildId>,
}

impl AppVars {
  pub fn new(store: SqliteStore, config: &BotConfig) -> Self {
    Self {
      store,
      teams: config.teams.clone(),
      log_channel: config.log_channel_id.map(ChannelId::new),
      guilds: config.guilds.iter().copied().map(GuildId::new).collect(),
    }
  }
}

pub type AppError = anyhow::Error;
pub type Context<'a> = poise::Context<'a, AppVars, AppError>;
