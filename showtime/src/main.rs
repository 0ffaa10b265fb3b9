//! Showtime booking HTTP server.
//!
//! Connects to `PostgreSQL`, applies migrations, seeds the sample catalog when
//! empty, starts the Prometheus exporter and serves the booking API.

use metrics_exporter_prometheus::PrometheusBuilder;
use rand::SeedableRng;
use rand::rngs::StdRng;
use showtime::{
    AppState, Config, StateSettings, build_router, metrics::register_business_metrics,
    seed::seed_sample_data,
};
use showtime_core::environment::{SystemClock, UuidTicketCodes};
use showtime_postgres::PostgresCatalogStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Pick up a local .env before reading anything
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(config.server.env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Showtime HTTP Server");

    let addr = config.server.socket_addr()?;
    info!(
        address = %addr,
        max_connections = config.postgres.max_connections,
        cache_ttl_secs = config.booking.listing_cache_ttl_secs,
        "Configuration loaded"
    );

    // Setup catalog store
    info!("Connecting to catalog database...");
    let store =
        PostgresCatalogStore::connect(&config.postgres.url, &config.postgres.pool_settings())
            .await?;
    store.migrate().await?;
    info!("Catalog database ready");

    let clock = Arc::new(SystemClock);

    if config.booking.seed_sample_data {
        let mut rng = StdRng::from_entropy();
        let report = seed_sample_data(&store, clock.as_ref(), &mut rng).await?;
        if report.is_empty() {
            info!("Catalog already populated");
        }
    }

    // Setup metrics
    if config.metrics.enabled {
        let metrics_addr = config.metrics.socket_addr()?;
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .install()?;
        register_business_metrics();
        info!(address = %metrics_addr, "Prometheus exporter listening");
    }

    // Build application state and router
    let state = AppState::new(
        Arc::new(store.clone()),
        clock,
        Arc::new(UuidTicketCodes),
        StateSettings {
            listing_cache_ttl: config.booking.listing_cache_ttl(),
            listing_cache_max_entries: config.booking.listing_cache_max_entries,
            listing_max_results: config.booking.listing_max_results,
            session_ttl: config.booking.session_ttl(),
        },
    );
    let app = build_router(state);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    let shutdown_timeout = config.server.shutdown_timeout();
    let server = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal());
    let drain = async {
        server.await?;
        Ok::<_, std::io::Error>(())
    };
    tokio::pin!(drain);

    tokio::select! {
        result = &mut drain => result?,
        () = shutdown_deadline(shutdown_timeout) => {
            warn!(timeout_secs = shutdown_timeout.as_secs(), "Graceful shutdown timed out");
        }
    }

    store.pool().close().await;
    info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        () = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}

/// Resolves `timeout` after the first shutdown signal, bounding how long
/// in-flight requests may drain.
async fn shutdown_deadline(timeout: Duration) {
    shutdown_signal().await;
    tokio::time::sleep(timeout).await;
}
