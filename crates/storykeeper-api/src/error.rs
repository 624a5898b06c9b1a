//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use storykeeper_core::Error as CoreError;
use thiserror::Error;

/// An error returned by an API handler or middleware.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The route requires an identity and the request carried none.
  #[error("authentication required")]
  Unauthenticated,

  /// Absent and not-owned resources share this variant and its body.
  #[error("not found")]
  NotFound,

  #[error("{0}")]
  BadRequest(String),

  /// Details are logged, never returned.
  #[error("internal server error")]
  Internal,
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match &e {
      CoreError::NotFound => ApiError::NotFound,
      CoreError::InvalidYear { .. }
      | CoreError::CrossWorld { .. }
      | CoreError::InvalidWorldBounds(_)
      | CoreError::InvalidInput(_)
      | CoreError::DuplicateIdentity
      | CoreError::InvalidCredentials => ApiError::BadRequest(e.to_string()),
      CoreError::ConfigurationMissing
      | CoreError::TokenParse(_)
      | CoreError::PasswordHash(_)
      | CoreError::Store(_) => {
        tracing::error!(error = %e, "request failed");
        ApiError::Internal
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
      ApiError::NotFound => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
