//! Handler for `POST /upload`.
//!
//! Body: `{"filename": "...", "contents": "data:<mime>;base64,<payload>"}`,
//! the shape a browser `FileReader.readAsDataURL` produces. On success the
//! whole dataset is replaced; on any failure the store is left untouched and
//! the error message is the status line for the page.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use pulse_core::{
  store::{Dataset, DatasetStore},
  table::{TablePage, TableQuery},
};
use serde::{Deserialize, Serialize};

use crate::{dataset::DatasetInfo, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct UploadBody {
  pub filename: String,
  pub contents: String,
}

/// New table state after a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
  /// `Loaded file: <name>`.
  pub status:  String,
  pub dataset: DatasetInfo,
  /// First page of the new table.
  pub table:   TablePage,
}

/// `POST /upload`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<UploadBody>, JsonRejection>,
) -> Result<Json<UploadResponse>, ApiError>
where
  S: DatasetStore,
{
  let Json(body) = body.map_err(|rejection| {
    tracing::warn!(error = %rejection, "upload body rejected");
    ApiError::from(rejection)
  })?;

  let table = match pulse_ingest::parse_upload(&body.filename, &body.contents)
  {
    Ok(table) => table,
    Err(e) => {
      tracing::warn!(filename = %body.filename, error = %e, "upload rejected");
      return Err(ApiError::from(e));
    }
  };

  let dataset = store
    .replace(Dataset::new(body.filename.clone(), table))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(
    filename = %body.filename,
    rows = dataset.table.len(),
    revision = %dataset.revision,
    "dataset replaced"
  );

  Ok(Json(UploadResponse {
    status:  format!("Loaded file: {}", body.filename),
    dataset: DatasetInfo::from(dataset.as_ref()),
    table:   dataset.table.page(&TableQuery::default())?,
  }))
}
