//! sdwis-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite extract, and serves the data browser API over HTTP.
//!
//! # Loading data
//!
//! The database is populated once from a SQL dump of the extract:
//!
//! ```sh
//! cargo run -p sdwis-server -- --import sdwis_ga.sql
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use sdwis_api::ApiState;
use sdwis_server::ServerConfig;
use sdwis_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "SDWIS drinking water data browser")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Load a SQL dump into the database and exit.
  #[arg(long, value_name = "FILE")]
  import: Option<PathBuf>,
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
  let server_cfg = ServerConfig::load(cli.config).context("failed to load configuration")?;

  let database_path = expand_tilde(&server_cfg.database_path);

  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open database at {database_path:?}"))?;

  // Import mode: load the dump and exit.
  if let Some(dump_path) = cli.import {
    let dump = tokio::fs::read_to_string(&dump_path)
      .await
      .with_context(|| format!("failed to read {dump_path:?}"))?;
    store
      .import_sql(dump)
      .await
      .with_context(|| format!("failed to import {dump_path:?}"))?;
    tracing::info!(?dump_path, ?database_path, "import complete");
    return Ok(());
  }

  let state = ApiState::new(Arc::new(store), server_cfg.target_state.as_str());

  // Warm the resolver so the first detail request does not pay for it.
  state
    .codes()
    .await
    .context("failed to load reference codes")?;

  let app = sdwis_server::app(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
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
