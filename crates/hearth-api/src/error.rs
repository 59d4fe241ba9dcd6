//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error response carries a JSON body of the shape
//! `{"message": "..."}`.

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
  /// Missing, malformed, or expired credential.
  #[error("authentication required")]
  Unauthenticated,

  /// Authenticated, but the wrong role or not the record's owner.
  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  /// Fold a store error into the HTTP taxonomy via the domain taxonomy.
  pub fn from_store<E: Into<hearth_core::Error>>(e: E) -> Self {
    Self::from(e.into())
  }
}

impl From<hearth_core::Error> for ApiError {
  fn from(e: hearth_core::Error) -> Self {
    use hearth_core::Error as E;
    match &e {
      E::JobNotFound(_) => Self::NotFound(e.to_string()),
      E::Forbidden | E::AccessDenied => Self::Forbidden(e.to_string()),
      E::InvalidSelection { .. }
      | E::InvalidStatus(_)
      | E::NotPending(_)
      | E::InvalidTransition(..) => Self::BadRequest(e.to_string()),
      E::Storage(msg) => Self::Internal(msg.clone()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthenticated => {
        (StatusCode::UNAUTHORIZED, self.to_string())
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
    };
    (status, Json(json!({ "message": message }))).into_response()
  }
}
