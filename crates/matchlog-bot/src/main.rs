//! matchlog bot binary.
//!
//! Reads `matchlog.toml` (or the path given with `--config`) plus
//! `MATCHLOG_*` environment variables, opens the SQLite match store, starts
//! the retention sweeper and connects to Discord.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use matchlog_bot::{AppVars, BotConfig, setup};
use matchlog_retention::Sweeper;
use matchlog_store_sqlite::SqliteStore;
use serenity::all::{Client, GatewayIntents};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Esports match log bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "matchlog.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let cfg = BotConfig::load(&cli.config).context("failed to load configuration")?;
  let policy = cfg.retention.policy();
  policy.validate().context("invalid retention settings")?;

  let store_path = expand_tilde(&cfg.store_path);
  let backup_path = expand_tilde(&cfg.backup_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  info!(path = %store_path.display(), "match store opened");

  let sweeper = Sweeper::new(store.clone(), policy, backup_path)
    .with_interval(cfg.retention.sweep_interval())
    .spawn();

  let framework = setup::build_framework(AppVars::new(store, &cfg));
  let mut client = Client::builder(&cfg.token, GatewayIntents::non_privileged())
    .framework(framework)
    .await
    .context("failed to build Discord client")?;

  let shard_manager = client.shard_manager.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      info!("shutdown requested");
      shard_manager.shutdown_all().await;
    }
  });

  let result = client.start().await.context("Discord client error");

  sweeper.shutdown().await;
  info!("matchlog stopped");
  result
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
