//! Handler for `GET /view`.
//!
//! Recomputes the four charts and the four summary cards from a snapshot of
//! the current dataset. Nothing is cached.

use std::sync::Arc;

use axum::{Json, extract::State};
use axum_extra::extract::Query;
use pulse_core::{
  selector::{Metric, Period},
  store::DatasetStore,
  view::{View, ViewRequest, build_view},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct ViewParams {
  /// `D`, `W`, `M`, `Q` or `Y`. Default `D`.
  #[serde(default)]
  pub period:   Period,
  /// `visits`, `time_spent`, `conversion` or `revenue`. Default `visits`.
  #[serde(default)]
  pub metric:   Metric,
  /// One `segments=` pair per selected label; none means all segments.
  #[serde(default)]
  pub segments: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
  /// Revision of the dataset the view was computed from.
  pub revision: Uuid,
  #[serde(flatten)]
  pub view:     View,
}

/// `GET /view[?period=..][&metric=..][&segments=a&segments=b]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ViewParams>,
) -> Result<Json<ViewResponse>, ApiError>
where
  S: DatasetStore,
{
  let request = ViewRequest {
    period:   params.period,
    metric:   params.metric,
    segments: params
      .segments
      .into_iter()
      .filter(|s| !s.trim().is_empty())
      .collect(),
  };

  let dataset = store
    .snapshot()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let view = build_view(&dataset.table, &request)?;

  Ok(Json(ViewResponse {
    revision: dataset.revision,
    view,
  }))
}
