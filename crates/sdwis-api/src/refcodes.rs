//! Handler for `GET /refcodes/{value_type}`.

use axum::{
  Json,
  extract::{Path, State},
};
use sdwis_core::{entity::RefCodeValue, store::SdwisStore};

use crate::{ApiState, error::ApiError};

/// `GET /refcodes/{value_type}`
///
/// An unknown value type yields an empty list.
pub async fn list<S: SdwisStore>(
  State(state): State<ApiState<S>>,
  Path(value_type): Path<String>,
) -> Result<Json<Vec<RefCodeValue>>, ApiError> {
  let rows = state
    .store
    .list_ref_codes(Some(&value_type))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(rows))
}
