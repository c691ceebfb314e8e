//! Payroll ledger HTTP server.
//!
//! Reads `app.yaml` and `policy.yaml` from `PAYROLL_CONFIG_DIR` (default
//! `./config`) and serves the API on the configured bind address, which
//! `PAYROLL_BIND` overrides. Log verbosity follows `RUST_LOG`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payroll_ledger::api::{AppState, create_router};
use payroll_ledger::config::ConfigLoader;
use payroll_ledger::store::{InMemoryStore, PayrollStore};

const DEFAULT_CONFIG_DIR: &str = "./config";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payroll_ledger=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    tracing::info!(config_dir = %config_dir, "Loading configuration");
    let config = ConfigLoader::load(&config_dir)?;

    let store: Arc<dyn PayrollStore> = match &config.settings().storage.snapshot_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using snapshot-backed store");
            Arc::new(InMemoryStore::with_snapshot(path.clone()).await?)
        }
        None => {
            tracing::warn!("No snapshot path configured, data is kept in memory only");
            Arc::new(InMemoryStore::new())
        }
    };

    let addr = std::env::var("PAYROLL_BIND")
        .unwrap_or_else(|_| config.settings().server.bind_address.clone());
    let app = create_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
