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
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<rolo_core::Error> for ApiError {
  fn from(e: rolo_core::Error) -> Self {
    match e {
      rolo_core::Error::Validation(m) => ApiError::BadRequest(m),
      rolo_core::Error::Unauthorized => ApiError::Unauthorized,
      rolo_core::Error::NotFound(id) => {
        ApiError::NotFound(format!("contact {id} not found"))
      }
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl From<rolo_billing::Error> for ApiError {
  fn from(e: rolo_billing::Error) -> Self {
    match e {
      rolo_billing::Error::SignatureInvalid => {
        ApiError::BadRequest("invalid signature".to_owned())
      }
      rolo_billing::Error::Payload(m) => ApiError::BadRequest(m),
      rolo_billing::Error::Json(e) => ApiError::BadRequest(e.to_string()),
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.clone()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
