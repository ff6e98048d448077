//! HTTP front end for the Pulse dashboard.
//!
//! Serves the page rendered once at startup, its script, and the JSON API
//! from [`pulse_api`] under `/api`, all backed by any [`DatasetStore`].

pub mod layout;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{
  Router,
  extract::State,
  http::header,
  response::{Html, IntoResponse},
  routing::get,
};
use pulse_core::store::{Dataset, DatasetStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

const DASHBOARD_JS: &str = include_str!("../assets/dashboard.js");

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from the optional config file
/// and `PULSE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  /// File loaded at startup instead of the built-in sample.
  #[serde(default)]
  pub data_path:        Option<PathBuf>,
  /// Upper bound on an upload request body.
  #[serde(default = "default_max_upload_bytes")]
  pub max_upload_bytes: usize,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8050 }

fn default_max_upload_bytes() -> usize { 10 * 1024 * 1024 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             default_host(),
      port:             default_port(),
      data_path:        None,
      max_upload_bytes: default_max_upload_bytes(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through the page handlers.
#[derive(Clone)]
pub struct AppState<S: DatasetStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  /// The rendered dashboard page.
  pub page:   Arc<str>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: page, script and `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DatasetStore + Clone + 'static,
{
  let api = pulse_api::api_router(
    Arc::clone(&state.store),
    state.config.max_upload_bytes,
  );

  Router::new()
    .route("/",                     get(index::<S>))
    .route("/static/dashboard.js",  get(script))
    .with_state(state)
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn index<S>(State(state): State<AppState<S>>) -> Html<String>
where
  S: DatasetStore + Clone,
{
  Html(state.page.to_string())
}

async fn script() -> impl IntoResponse {
  (
    [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
    DASHBOARD_JS,
  )
}

// ─── Startup data ─────────────────────────────────────────────────────────────

/// The dataset served before the first upload: the file at `data_path` when
/// configured, otherwise the built-in sample.
pub fn initial_dataset(config: &ServerConfig) -> anyhow::Result<Dataset> {
  match &config.data_path {
    Some(path) => load_dataset(&expand_tilde(path)),
    None => Ok(Dataset::sample()),
  }
}

/// Read `path` through the same parser used for uploads.
pub fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
  let filename = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .with_context(|| format!("{path:?} has no file name"))?;
  let bytes = std::fs::read(path)
    .with_context(|| format!("failed to read {path:?}"))?;
  let table = pulse_ingest::parse(&filename, &bytes)
    .with_context(|| format!("failed to load {path:?}"))?;

  tracing::info!(file = %filename, rows = table.len(), "loaded initial dataset");
  Ok(Dataset::new(filename, table))
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
