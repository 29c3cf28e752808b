//! rolo server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API over HTTP.
//!
//! # Configuration keys
//!
//! ```toml
//! host                  = "127.0.0.1"
//! port                  = 8374
//! store_path            = "~/.local/share/rolo/rolo.db"
//! stripe_secret_key     = "sk_test_..."
//! stripe_webhook_secret = "whsec_..."
//! stripe_price_id       = "price_..."
//! checkout_success_url  = "http://localhost:3000/contacts?success=true"
//! checkout_cancel_url   = "http://localhost:3000/pricing?canceled=true"
//! ```
//!
//! Every key can also be supplied as an environment variable with the
//! `ROLO_` prefix.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use rolo_api::{ApiState, BillingContext};
use rolo_billing::{CheckoutClient, CheckoutConfig};
use rolo_store_sqlite::SqliteStore;
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
struct ServerConfig {
  host:                  String,
  port:                  u16,
  store_path:            PathBuf,
  stripe_secret_key:     String,
  stripe_webhook_secret: String,
  stripe_price_id:       String,
  checkout_success_url:  String,
  checkout_cancel_url:   String,
  #[serde(default = "default_api_base")]
  stripe_api_base:       String,
}

fn default_api_base() -> String { CheckoutConfig::DEFAULT_API_BASE.to_string() }

#[derive(Parser)]
#[command(author, version, about = "rolo contact-manager server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROLO"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Build application state.
  let checkout = CheckoutClient::new(CheckoutConfig {
    secret_key:  server_cfg.stripe_secret_key.clone(),
    price_id:    server_cfg.stripe_price_id.clone(),
    success_url: server_cfg.checkout_success_url.clone(),
    cancel_url:  server_cfg.checkout_cancel_url.clone(),
    api_base:    server_cfg.stripe_api_base.clone(),
  })
  .context("failed to build checkout client")?;

  let state = ApiState {
    store:   Arc::new(store),
    billing: Arc::new(BillingContext {
      webhook_secret: server_cfg.stripe_webhook_secret.clone(),
      checkout,
    }),
  };

  let app = rolo_api::api_router(state).layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
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
