//! JSON API for the Pulse dashboard.
//!
//! Exposes an axum [`Router`] backed by any
//! [`pulse_core::store::DatasetStore`]. Page rendering, logging setup and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", pulse_api::api_router(store.clone(), 10 * 1024 * 1024))
//! ```

pub mod dataset;
pub mod error;
pub mod upload;
pub mod view;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use pulse_core::store::DatasetStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// `max_upload_bytes` bounds the size of an upload request body (the
/// base64-encoded file plus its JSON envelope).
pub fn api_router<S>(store: Arc<S>, max_upload_bytes: usize) -> Router<()>
where
  S: DatasetStore + 'static,
{
  Router::new()
    // Dataset
    .route("/dataset", get(dataset::info::<S>))
    .route("/dataset/rows", get(dataset::rows::<S>))
    // Upload
    .route(
      "/upload",
      post(upload::handler::<S>).layer(DefaultBodyLimit::max(max_upload_bytes)),
    )
    // Charts and summary cards
    .route("/view", get(view::handler::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
