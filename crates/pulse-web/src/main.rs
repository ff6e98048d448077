//! pulse-web server binary.
//!
//! Reads `pulse.toml` (or the path given with `--config`) layered under
//! `PULSE_*` environment variables, loads the initial dataset, and serves the
//! dashboard over HTTP.
//!
//! ```text
//! PULSE_PORT=9000 PULSE_DATA_PATH=~/activity.csv pulse-web --debug
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use pulse_core::store::MemoryStore;
use pulse_web::{AppState, ServerConfig, layout};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Pulse customer activity dashboard")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "pulse.toml")]
  config: PathBuf,

  /// Log at DEBUG instead of INFO unless `RUST_LOG` says otherwise.
  #[arg(long)]
  debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  // Initialise tracing.
  let default_level = if cli.debug { LevelFilter::DEBUG } else { LevelFilter::INFO };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy(),
    )
    .init();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("PULSE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Initial dataset and the page built from it.
  let dataset = pulse_web::initial_dataset(&server_cfg)?;
  let page = layout::render(&dataset).context("failed to render page")?;
  tracing::info!(
    source = %dataset.source,
    rows = dataset.table.len(),
    "serving initial dataset"
  );

  // Build application state.
  let state = AppState {
    store:  Arc::new(MemoryStore::new(dataset)),
    config: Arc::new(server_cfg.clone()),
    page:   page.into(),
  };

  let app = pulse_web::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
