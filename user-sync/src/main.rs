//! UserSync Web Server - Clerk user webhook receiver.
//!
//! This binary serves a single webhook endpoint that:
//! - Verifies Svix signatures on inbound Clerk events
//! - Mirrors user created/updated/deleted events into MongoDB
//! - Acknowledges every other event kind with 200 OK

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use usersync::web::{router, Webhook};
use usersync::{AppState, Config, MongoUserStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        signing_secret_configured = config.signing_secret.is_some(),
        signature_tolerance_secs = config.signature_tolerance_secs,
        mongodb_database = %config.mongodb_database,
        users_collection = %config.users_collection,
        "config_loaded"
    );

    match config.signing_secret.as_deref().map(Webhook::new) {
        None => warn!("signing_secret_missing"),
        Some(Err(e)) => warn!(error = %e, "signing_secret_invalid"),
        Some(Ok(_)) => {}
    }

    // Connection is deferred to the first request
    let store = MongoUserStore::new(
        config.mongodb_uri.clone(),
        config.mongodb_database.clone(),
        config.users_collection.clone(),
    );

    let state = AppState::new(config.clone(), Arc::new(store));
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
