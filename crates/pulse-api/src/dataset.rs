//! Handlers for `/dataset` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/dataset` | Revision, source, columns, segment options |
//! | `GET`  | `/dataset/rows` | Optional `page`, `page_size`, `sort`, `desc`, `filter` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{DateTime, Utc};
use pulse_core::{
  selector::SelectOption,
  store::{Dataset, DatasetStore},
  table::{DEFAULT_PAGE_SIZE, TablePage, TableQuery},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Info ─────────────────────────────────────────────────────────────────────

/// Metadata about the current dataset, enough to rebuild the selectors.
#[derive(Debug, Serialize)]
pub struct DatasetInfo {
  pub revision:  Uuid,
  pub source:    String,
  pub loaded_at: DateTime<Utc>,
  pub columns:   Vec<String>,
  pub rows:      usize,
  /// One option per distinct segment, in first-appearance order.
  pub segments:  Vec<SelectOption>,
  /// Segments selected by default: all of them.
  pub selected:  Vec<String>,
}

impl From<&Dataset> for DatasetInfo {
  fn from(d: &Dataset) -> Self {
    let segments = d.table.segments();
    DatasetInfo {
      revision:  d.revision,
      source:    d.source.clone(),
      loaded_at: d.loaded_at,
      columns:   d.table.columns().to_vec(),
      rows:      d.table.len(),
      segments:  segments
        .iter()
        .map(|s| SelectOption {
          label: s.clone(),
          value: s.clone(),
        })
        .collect(),
      selected:  segments,
    }
  }
}

/// `GET /dataset`
pub async fn info<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<DatasetInfo>, ApiError>
where
  S: DatasetStore,
{
  let dataset = store
    .snapshot()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(DatasetInfo::from(dataset.as_ref())))
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RowsParams {
  /// Zero-based page index. Default `0`.
  #[serde(default)]
  pub page:      usize,
  /// Rows per page. Default 10.
  pub page_size: Option<usize>,
  /// Column to sort by.
  pub sort:      Option<String>,
  /// Sort descending. Default `false`.
  #[serde(default)]
  pub desc:      bool,
  /// Case-insensitive text matched against every cell.
  pub filter:    Option<String>,
}

impl From<RowsParams> for TableQuery {
  fn from(p: RowsParams) -> Self {
    TableQuery {
      page:       p.page,
      page_size:  p.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
      sort:       p.sort.filter(|s| !s.is_empty()),
      descending: p.desc,
      filter:     p.filter,
    }
  }
}

/// A page of rows tagged with the revision it was cut from.
#[derive(Debug, Serialize)]
pub struct RowsResponse {
  pub revision: Uuid,
  #[serde(flatten)]
  pub page:     TablePage,
}

/// `GET /dataset/rows[?page=..][&page_size=..][&sort=..][&desc=true][&filter=..]`
pub async fn rows<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<RowsParams>,
) -> Result<Json<RowsResponse>, ApiError>
where
  S: DatasetStore,
{
  let dataset = store
    .snapshot()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let page = dataset.table.page(&TableQuery::from(params))?;
  Ok(Json(RowsResponse {
    revision: dataset.revision,
    page,
  }))
}
