//! Error types for `sdwis-core`.
//!
//! Operations are generic over the storage backend, so the backend's own
//! error type rides along in [`Error::Store`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error<E> {
  #[error("water system not found: {0}")]
  SystemNotFound(String),

  #[error("store error: {0}")]
  Store(#[source] E),
}

pub type Result<T, E> = std::result::Result<T, Error<E>>;
