//! # Gudang API Server
//!
//! Boots the HTTP API: config → database → tracking client → router.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gudang_db::{Database, DbConfig};
use gudang_server::auth::TokenManager;
use gudang_server::{routes, AppState, Config};
use gudang_tracking::{CourierClient, CourierClientConfig, Synchronizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Gudang API server...");

    let config = Config::load()?;
    info!(
        port = config.http_port,
        db = %config.database_path,
        "Configuration loaded"
    );

    // The database file lives in a subdirectory by default; make sure it
    // exists before sqlite tries to create the file.
    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating database directory {}", parent.display()))?;
        }
    }

    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    let courier_client = CourierClient::new(CourierClientConfig {
        base_url: config.klikresi_base_url.clone(),
        api_key: config.klikresi_api_key.clone(),
        timeout: config.tracking_timeout,
    })?;
    let tracking =
        Synchronizer::new(db.clone(), courier_client).sweep_delay(config.tracking_sweep_delay);

    let state = AppState::new(
        db,
        TokenManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs),
        tracking,
    );

    let app = routes::create_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
