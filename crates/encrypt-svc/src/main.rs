//! `encrypt-svc` — binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise the telemetry pipeline (tracing + optional OTLP).
//! 3. Generate the process key from the OS CSPRNG. Failure aborts startup.
//! 4. Build the Axum router and start the HTTP server.

mod config;
mod crypto;
mod platform;
mod server;
mod telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use config::Config;
use crypto::{Encryptor, OsEntropy, SecretKey};
use server::{middleware::HttpLimits, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init_telemetry(cfg.otlp_endpoint(), &cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        architecture = platform::architecture(),
        "encrypt-svc starting"
    );

    // -----------------------------------------------------------------------
    // 3. Process key
    // -----------------------------------------------------------------------
    let key = SecretKey::generate(&OsEntropy).context("failed to generate process key")?;
    let encryptor = Encryptor::new(key, Arc::new(OsEntropy));
    info!("process key generated");

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(encryptor);
    let router = server::router::build(state, HttpLimits::from(&cfg));

    let addr = cfg.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "listening");

    let served = axum::serve(listener, router).await;
    telemetry::shutdown_telemetry();
    served.context("HTTP server terminated")
}
