//! Registry server binary.
//!
//! Loads configuration, initializes logging, and serves the HTTP API over
//! a fresh in-memory registry.

use anyhow::Context;
use clap::Parser;
use solace_registry::config::Settings;
use solace_registry::http::{router, AppState};
use solace_registry::registry::AgentRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Solace agent registry service
#[derive(Parser)]
#[command(name = "solace-registry")]
#[command(about = "Agent registry service for the Solace agent-commerce protocol")]
struct Cli {
    /// Bind address, overrides configuration
    #[arg(long, env = "SOLACE_ADDR")]
    addr: Option<String>,

    /// Configuration file path (TOML)
    #[arg(long, env = "SOLACE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings =
        Settings::load(cli.config.as_deref()).context("failed to load configuration")?;
    solace_registry::logging::init(&settings.logging)
        .map_err(|e| anyhow::anyhow!(e.to_string()))
        .context("failed to initialize logging")?;

    let addr = cli.addr.unwrap_or_else(|| settings.bind_addr());
    let registry = Arc::new(AgentRegistry::new());
    let app = router(AppState { registry });

    info!(
        addr = %addr,
        environment = ?settings.environment,
        network = %settings.solana.network,
        "starting agent registry"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("agent registry stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
