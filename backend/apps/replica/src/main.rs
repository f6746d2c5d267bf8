//! Local Replica Entry Point
//!
//! Serves the identity endpoints and the remote actor operations from
//! process memory, for development against `MetaverseConfig::development()`.
//! Uses `anyhow` for startup errors; request-level errors are rendered
//! by `MetaverseError` as problem JSON.

use std::env;
use std::net::SocketAddr;

use axum::{
    http,
    http::{Method, header},
};
use metaverse::{InMemoryActor, MetaverseConfig, presentation::ReplicaState, replica_router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ADDR: &str = "127.0.0.1:4943";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "replica=info,metaverse=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MetaverseConfig::from_env()?;

    // Actor state
    let seed_demo = env::var("REPLICA_SEED_DEMO")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(true);

    let actor = if seed_demo {
        InMemoryActor::with_demo_worlds()?
    } else {
        InMemoryActor::new()
    };

    tracing::info!(seed_demo, "Replica state initialized");

    let state = ReplicaState::new(actor, config.delegation_ttl);

    let cors = cors_layer(&env::var("FRONTEND_ORIGINS").unwrap_or_else(|_| {
        "http://localhost:3000,http://127.0.0.1:3000".to_string()
    }));

    // Build router
    let app = replica_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("REPLICA_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;
    tracing::info!(%addr, strict_mode = config.strict_mode, "Replica listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Replica stopped");
    Ok(())
}

/// Browser clients call the replica directly with a bearer delegation
fn cors_layer(origins: &str) -> CorsLayer {
    let allowed_origins: Vec<http::HeaderValue> = origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
