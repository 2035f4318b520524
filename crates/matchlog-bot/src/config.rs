//! Bot configuration, loaded from a TOML file and `MATCHLOG_*` environment
//! variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use matchlog_core::{
  retention::{CutoverDate, DEFAULT_HORIZON_DAYS, RetentionPolicy},
  team::TeamRoster,
};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Discord bot token.
  pub token:          String,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  #[serde(default = "default_backup_path")]
  pub backup_path:    PathBuf,
  #[serde(default)]
  pub log_channel_id: Option<u64>,
  #[serde(default)]
  pub teams:          TeamRoster,
  #[serde(default)]
  pub guilds:         Vec<u64>,
  #[serde(default)]
  pub retention:      RetentionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
  #[serde(default = "default_horizon_days")]
  pub horizon_days:        u32,
  #[serde(default = "default_cutover")]
  pub cutover:             Vec<CutoverDate>,
  #[serde(default = "default_sweep_interval_secs")]
  pub sweep_interval_secs: u64,
}

fn default_store_path() -> PathBuf { PathBuf::from("matches.db") }

fn default_backup_path() -> PathBuf { PathBuf::from("matches_backup.db") }

fn default_horizon_days() -> u32 { DEFAULT_HORIZON_DAYS }

fn default_cutover() -> Vec<CutoverDate> { RetentionPolicy::default().cutover }

fn default_sweep_interval_secs() -> u64 { 12 * 60 * 60 }

impl Default for RetentionConfig {
  fn default() -> Self {
    Self {
      horizon_days:        default_horizon_days(),
      cutover:             default_cutover(),
      sweep_interval_secs: default_sweep_interval_secs(),
    }
  }
}

impl RetentionConfig {
  pub fn policy(&self) -> RetentionPolicy {
    RetentionPolicy {
      horizon_days: self.horizon_days,
      cutover:      self.cutover.clone(),
    }
  }

  pub fn sweep_interval(&self) -> Duration { Duration::from_secs(self.sweep_interval_secs) }
}

impl BotConfig {
  /// Read `path` (if it exists), then overlay `MATCHLOG_*` variables.
  ///
  /// Nested keys use a double underscore, e.g.
  /// `MATCHLOG_RETENTION__HORIZON_DAYS=90`; list keys are comma-separated.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(env_source()),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
    builder.build()?.try_deserialize()
  }
}

fn env_source() -> Environment {
  Environment::with_prefix("MATCHLOG")
    .prefix_separator("_")
    .separator("__")
    .list_separator(",")
    .with_list_parse_key("teams")
    .with_list_parse_key("guilds")
    .try_parsing(true)
}
