// ============================
// crates/backend-bin/src/main.rs
// ============================
//! Entry point for the account service.
use std::net::SocketAddr;
use std::path::PathBuf;

use backend_lib::{config::Settings, create_router, telemetry, AppState};
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "accounts-server", version, about = "User account and token service")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "ACCOUNTS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(bind) = cli.bind {
        settings.bind_addr = bind;
    }

    telemetry::init_tracing(&settings)?;
    tracing::debug!(?settings, "loaded settings");

    let addr = settings.bind_addr;
    let state = AppState::from_settings(settings)?;
    match state.tokens.ttl() {
        Some(ttl) => tracing::info!(ttl_secs = ttl.as_secs(), "bearer tokens expire"),
        None => tracing::warn!("bearer tokens never expire; set auth.token_ttl_secs to bound them"),
    }
    let app = create_router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
