//! activities-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use activities_gateway::api;
use activities_gateway::app_state::AppState;
use activities_gateway::config::GatewayConfig;
use activities_gateway::domain::{ActivityRegistry, EventBus};
use activities_gateway::persistence::PostgresStore;
use activities_gateway::service::RosterService;
use activities_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting activities-gateway");

    // Build domain layer
    let registry = Arc::new(ActivityRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer, with durable storage when enabled
    let mut roster_service = RosterService::new(Arc::clone(&registry), event_bus.clone());
    if config.persistence_enabled {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;
        let store = PostgresStore::new(
            pool,
            config.store_retry_attempts,
            config.store_retry_backoff(),
        );
        store.run_migrations().await?;
        roster_service = roster_service.with_store(Arc::new(store));
        tracing::info!("persistence enabled");
    }

    let loaded = roster_service.load_or_seed(config.seed_defaults).await?;
    tracing::info!(loaded, "activity rosters ready");

    // Build application state
    let app_state = AppState {
        roster_service: Arc::new(roster_service),
        event_bus,
        ws_send_timeout: config.ws_send_timeout(),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
