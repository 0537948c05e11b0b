//! Handler for `GET /systems/search`.
//!
//! Every parameter is optional. Pagination values arrive as raw strings so a
//! malformed `limit` or `offset` falls back to its default instead of
//! rejecting the request.

use axum::{
  Json,
  extract::{Query, State},
};
use sdwis_core::{
  search::{SearchResponse, SystemQuery, search},
  store::SdwisStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Case-insensitive substring of the system name, id, or owner organisation.
  pub q:           Option<String>,
  pub city:        Option<String>,
  /// Exact `PWS_TYPE_CODE`, e.g. `CWS`.
  #[serde(rename = "type")]
  pub system_type: Option<String>,
  /// Exact `PRIMARY_SOURCE_CODE`, e.g. `GW`.
  #[serde(rename = "source")]
  pub source_type: Option<String>,
  pub limit:       Option<String>,
  pub offset:      Option<String>,
}

/// `GET /systems/search[?q=...][&city=...][&type=...][&source=...][&limit=...][&offset=...]`
pub async fn handler<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
  let query = SystemQuery::from_params(
    params.q,
    params.city,
    params.system_type,
    params.source_type,
    params.limit.as_deref(),
    params.offset.as_deref(),
  );
  tracing::debug!(?query, "searching water systems");

  let response = search(&*state.store, &query).await?;
  Ok(Json(response))
}
