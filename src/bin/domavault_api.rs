//! DomaVault API Server
//!
//! REST API for domain collateral scoring
//!
//! Usage:
//!   cargo run --bin domavault_api
//!
//! Environment:
//!   PORT / DOMAVAULT_PORT - Server port (default: 3000)
//!   DOMAVAULT_HOST        - Server host (default: 0.0.0.0)
//!   DOMA_API_ENDPOINT     - Doma GraphQL endpoint
//!   DOMA_API_KEY          - Server-side Doma API key (optional)
//!   RUST_LOG              - Log filter (default: domavault=info,tower_http=info)

use domavault::api::{create_router, start_cleanup_task, AppState};
use domavault::utils::constants::{APP_NAME, APP_VERSION};
use domavault::AppConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("domavault=info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;

    if config.doma.api_key.is_none() {
        warn!("DOMA_API_KEY not set: requests without a client key will use demo data");
    }

    // Create app state
    let state = Arc::new(AppState::new(&config)?);

    // Start background cleanup task for rate limiter
    let cleanup = start_cleanup_task(state.rate_limiter.clone());

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;

    info!(version = APP_VERSION, "{} API starting on http://{}", APP_NAME, addr);
    info!(endpoint = %config.doma.endpoint, "Doma registry");
    info!(
        max_requests = config.rate_limit.requests_per_window,
        window_secs = config.rate_limit.window_duration.as_secs(),
        "Rate limit"
    );
    info!("Endpoints:");
    info!("  POST /api/analyze              - Full domain analysis");
    info!("  POST /api/analyze-batch        - Batch analysis (up to 10 domains)");
    info!("  POST /api/compare              - Compare 2-5 domains");
    info!("  GET  /api/activities/:domain   - Activity history");
    info!("  GET  /api/quick-score/:domain  - Quick score");
    info!("  GET  /api/supported-tlds       - Supported TLDs");
    info!("  GET  /api/health               - Health check");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    };

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    cleanup.abort();
    info!("{} API shutdown complete", APP_NAME);

    Ok(())
}
