//! JSON REST API for the SDWIS data browser.
//!
//! Exposes an axum [`Router`] backed by any [`sdwis_core::store::SdwisStore`].
//! TLS, timeouts, and other transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sdwis_api::api_router(ApiState::new(store, "GA")))
//! ```

pub mod counties;
pub mod error;
pub mod refcodes;
pub mod search;
pub mod systems;

use std::sync::Arc;

use axum::{Router, routing::get};
use sdwis_core::{resolver::RefCodeResolver, store::SdwisStore};
use tokio::sync::OnceCell;

pub use error::ApiError;

// ─── State ───────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:        Arc<S>,
  /// State whose systems the county rollup covers (e.g. `"GA"`).
  pub target_state: Arc<str>,
  codes:            Arc<OnceCell<RefCodeResolver>>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:        Arc::clone(&self.store),
      target_state: Arc::clone(&self.target_state),
      codes:        Arc::clone(&self.codes),
    }
  }
}

impl<S: SdwisStore> ApiState<S> {
  pub fn new(store: Arc<S>, target_state: impl Into<Arc<str>>) -> Self {
    Self {
      store,
      target_state: target_state.into(),
      codes: Arc::new(OnceCell::new()),
    }
  }

  /// The reference code resolver, loaded from the store on first use.
  ///
  /// Concurrent first callers wait on a single load; after that the
  /// resolver is never reloaded. A failed load is not cached, so the next
  /// request tries again.
  pub async fn codes(&self) -> Result<&RefCodeResolver, ApiError> {
    let codes = self
      .codes
      .get_or_try_init(|| async {
        let codes = RefCodeResolver::load(&*self.store).await?;
        tracing::info!(types = codes.type_count(), "loaded reference codes");
        Ok::<_, ApiError>(codes)
      })
      .await?;
    Ok(codes)
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: SdwisStore + 'static,
{
  Router::new()
    // Search
    .route("/systems/search", get(search::handler::<S>))
    // Systems
    .route("/systems/{pwsid}", get(systems::detail::<S>))
    .route("/systems/{pwsid}/violations", get(systems::violations::<S>))
    .route("/systems/{pwsid}/facilities", get(systems::facilities::<S>))
    .route("/systems/{pwsid}/areas", get(systems::areas::<S>))
    .route("/systems/{pwsid}/visits", get(systems::visits::<S>))
    .route("/systems/{pwsid}/samples", get(systems::samples::<S>))
    .route("/systems/{pwsid}/events", get(systems::events::<S>))
    // Rollups
    .route("/counties", get(counties::handler::<S>))
    // Reference data
    .route("/refcodes/{value_type}", get(refcodes::list::<S>))
    .with_state(state)
}
