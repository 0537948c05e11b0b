//! Handler for `GET /counties`.

use axum::{Json, extract::State};
use sdwis_core::{
  county::{CountyReport, aggregate_by_county},
  store::SdwisStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /counties`
pub async fn handler<S: SdwisStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<CountyReport>, ApiError> {
  let report = aggregate_by_county(&*state.store, &state.target_state).await?;
  Ok(Json(report))
}
