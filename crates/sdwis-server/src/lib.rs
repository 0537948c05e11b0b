//! HTTP server assembly for the SDWIS data browser.
//!
//! Owns the runtime configuration and mounts the JSON API under `/api`.

use std::path::PathBuf;

use axum::Router;
use sdwis_api::{ApiState, api_router};
use sdwis_core::store::SdwisStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SDWIS_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  /// SQLite file holding the imported extract.
  #[serde(default = "default_database_path")]
  pub database_path: PathBuf,
  /// Two-letter state code the county rollup covers.
  #[serde(default = "default_target_state")]
  pub target_state:  String,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_database_path() -> PathBuf { PathBuf::from("data.db") }

fn default_target_state() -> String { "GA".to_owned() }

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `SDWIS_*` environment
  /// variables.
  pub fn load(path: PathBuf) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SDWIS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the top-level application router.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: SdwisStore + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
