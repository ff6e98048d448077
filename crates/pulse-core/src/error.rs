//! Error types for `pulse-core`.

use thiserror::Error;

use crate::selector::Metric;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required columns: {}", .0.join(", "))]
  MissingColumns(Vec<String>),

  #[error("metric {} is not available in the current dataset", .0.column())]
  MetricUnavailable(Metric),

  #[error("unknown column: {0:?}")]
  UnknownColumn(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
