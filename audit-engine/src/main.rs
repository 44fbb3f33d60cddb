//! Audit Engine - sale webhook receiver.
//!
//! Receives sale notifications, generates an automation audit and emails it
//! to the purchaser before acknowledging the webhook.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use audit_engine::{router, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("audit_engine_starting");

    dotenvy::dotenv().ok();

    // Fail fast on missing API keys
    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        groq_api_url = %config.groq_api_url,
        groq_model = %config.groq_model,
        completion_timeout_ms = config.completion_timeout_ms,
        resend_api_url = %config.resend_api_url,
        email_timeout_ms = config.email_timeout_ms,
        audit_from = %config.audit_from,
        audit_domain = %config.audit_domain,
        "config_loaded"
    );

    let http = Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let port = config.port;
    let state = AppState::new(config, http).context("Failed to load email templates")?;
    let app = router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "audit_engine_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("audit_engine_shutdown_complete");

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

    info!("audit_engine_shutting_down");
}
