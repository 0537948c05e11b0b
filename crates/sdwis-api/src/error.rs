//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Responses carry a fixed message only. Store failures are logged here with
//! their full context and surface to the client as a bare 500.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("water system not found: {0}")]
  NotFound(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl<E> From<sdwis_core::Error<E>> for ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  fn from(err: sdwis_core::Error<E>) -> Self {
    match err {
      sdwis_core::Error::SystemNotFound(pwsid) => ApiError::NotFound(pwsid),
      sdwis_core::Error::Store(e) => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(pwsid) => {
        tracing::debug!(%pwsid, "water system not found");
        (StatusCode::NOT_FOUND, "water system not found")
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
