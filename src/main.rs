use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use switchtransact_viewer::app::{build_router, shutdown_signal};
use switchtransact_viewer::config::Config;
use switchtransact_viewer::handlers::{seed_status_from_probe, AppState};
use switchtransact_viewer::status::StatusTracker;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - The SwitchTransact client and the optional startup status probe.
/// - HTTP routes and middleware (CORS, body limit, tracing).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchtransact_viewer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let status = StatusTracker::new();
    let app_state = AppState::new(config.clone(), status.clone())?;

    match app_state.client.as_ref() {
        Some(client) if config.startup_probe => {
            seed_status_from_probe(client, &status).await;
        }
        Some(_) => tracing::info!("Startup status probe disabled"),
        None => tracing::warn!("SwitchTransact client not initialized: no API key configured"),
    }

    let app = build_router(Arc::new(app_state));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
