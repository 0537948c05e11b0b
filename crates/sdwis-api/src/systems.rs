//! Handlers for `/systems/{pwsid}` and its per-entity sub-resources.
//!
//! The detail view carries decoded codes and capped lists. The sub-resources
//! return the raw store rows under the same caps and orderings, and answer
//! 404 for an unknown system rather than an empty list.

use axum::{
  Json,
  extract::{Path, State},
};
use sdwis_core::{
  detail::{SystemDetail, system_detail},
  entity::{EventMilestone, Facility, GeographicArea, LcrSample, SiteVisit, Violation},
  store::SdwisStore,
};

use crate::{ApiState, error::ApiError};

// ─── Detail ──────────────────────────────────────────────────────────────────

/// `GET /systems/{pwsid}`
pub async fn detail<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(pwsid): Path<String>,
) -> Result<Json<SystemDetail>, ApiError> {
  let codes = state.codes().await?;
  let detail = system_detail(&*state.store, codes, &pwsid).await?;
  Ok(Json(detail))
}

// ─── Sub-resources ───────────────────────────────────────────────────────────

async fn ensure_system<S: SdwisStore>(store: &S, pwsid: &str) -> Result<(), ApiError> {
  store
    .get_system(pwsid)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(|_| ())
    .ok_or_else(|| ApiError::NotFound(pwsid.to_owned()))
}

/// `GET /systems/{pwsid}/violations`
pub async fn violations<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(pwsid): Path<String>,
) -> Result<Json<Vec<Violation>>, ApiError> {
  ensure_system(&*state.store, &pwsid).await?;
  let rows = state
    .store
    .list_violations(&pwsid)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

/// `GET /systems/{pwsid}/facilities`
pub async fn facilities<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(pwsid): Path<String>,
) -> Result<Json<Vec<Facility>>, ApiError> {
  ensure_system(&*state.store, &pwsid).await?;
  let rows = state
    .store
    .list_facilities(&pwsid)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

/// `GET /systems/{pwsid}/areas`
pub async fn areas<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(pwsid): Path<String>,
) -> Result<Json<Vec<GeographicArea>>, ApiError> {
  ensure_system(&*state.store, &pwsid).await?;
  let rows = state
    .store
    .list_geographic_areas(&pwsid)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

/// `GET /systems/{pwsid}/visits`
pub async fn visits<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(pwsid): Path<String>,
) -> Result<Json<Vec<SiteVisit>>, ApiError> {
  ensure_system(&*state.store, &pwsid).await?;
  let rows = state
    .store
    .list_site_visits(&pwsid)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

/// `GET /systems/{pwsid}/samples`
pub async fn samples<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(pwsid): Path<String>,
) -> Result<Json<Vec<LcrSample>>, ApiError> {
  ensure_system(&*state.store, &pwsid).await?;
  let rows = state
    .store
    .list_lcr_samples(&pwsid)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}

/// `GET /systems/{pwsid}/events`
pub async fn events<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(pwsid): Path<String>,
) -> Result<Json<Vec<EventMilestone>>, ApiError> {
  ensure_system(&*state.store, &pwsid).await?;
  let rows = state
    .store
    .list_events(&pwsid)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}
