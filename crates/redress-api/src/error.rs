//! API error type and [`axum::response::IntoResponse`] implementation.

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
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// No principal headers were supplied.
  #[error("unauthorized: {0}")]
  Unauthorized(String),

  /// The request is well-formed but conflicts with the complaint's state,
  /// e.g. a denied status transition.
  #[error("{0}")]
  Conflict(String),

  /// A precondition the server itself should have guaranteed was violated.
  #[error("internal error: {0}")]
  Internal(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store error. Failures whose cause is a [`redress_core::Error`]
  /// (a missing complaint, an illegal or stale status change) are mapped
  /// like the core error itself; anything else is a 500.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    let domain = {
      let root: &(dyn std::error::Error + 'static) = &e;
      std::iter::successors(Some(root), |err| err.source())
        .find_map(|err| err.downcast_ref::<redress_core::Error>())
        .map(Self::from_core)
    };
    domain.unwrap_or_else(|| Self::Store(Box::new(e)))
  }

  fn from_core(e: &redress_core::Error) -> Self {
    use redress_core::Error as Core;
    match e {
      Core::StatusTransitionDenied { .. } | Core::StaleStatus { .. } => {
        Self::Conflict(e.to_string())
      }
      Core::InvalidScopeUser(_) => {
        tracing::error!(error = %e, "scope filter precondition failed");
        Self::Internal("internal error".into())
      }
      Core::ComplaintNotFound(id) => {
        Self::NotFound(format!("complaint {id} not found"))
      }
      Core::InvalidPattern(_) => {
        tracing::error!(error = %e, "predicate pattern failed to compile");
        Self::Internal("internal error".into())
      }
    }
  }
}

impl From<redress_core::Error> for ApiError {
  fn from(e: redress_core::Error) -> Self { Self::from_core(&e) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
