//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Upload failures carry the status line shown under the upload control.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pulse_core::record::REQUIRED_COLUMNS;
use pulse_ingest::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  UnsupportedFormat(String),

  #[error("{0}")]
  MissingColumns(String),

  #[error("{0}")]
  PayloadTooLarge(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<pulse_ingest::Error> for ApiError {
  fn from(e: pulse_ingest::Error) -> Self {
    match e.kind() {
      ErrorKind::UnsupportedFormat => {
        ApiError::UnsupportedFormat("Unsupported file format".to_string())
      }
      ErrorKind::MissingColumns => ApiError::MissingColumns(format!(
        "File must contain columns: {}",
        REQUIRED_COLUMNS.join(", ")
      )),
      ErrorKind::Parse => {
        ApiError::BadRequest(format!("Error loading file: {e}"))
      }
    }
  }
}

/// Upload bodies that never reach the codec: oversized or not the expected
/// JSON envelope.
impl From<JsonRejection> for ApiError {
  fn from(r: JsonRejection) -> Self {
    if r.status() == StatusCode::PAYLOAD_TOO_LARGE {
      ApiError::PayloadTooLarge(
        "Error loading file: file exceeds the upload size limit".to_string(),
      )
    } else {
      ApiError::BadRequest(format!("Error loading file: {}", r.body_text()))
    }
  }
}

impl From<pulse_core::Error> for ApiError {
  fn from(e: pulse_core::Error) -> Self { ApiError::BadRequest(e.to_string()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      ApiError::MissingColumns(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
