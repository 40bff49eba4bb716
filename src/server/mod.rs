//! HTTP surface.

pub mod auth;
pub mod error;
pub mod routes;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::{core::TripPlanner, store::TripStore};

/// Shared handles for request handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<TripPlanner>,
    pub store: Arc<dyn TripStore>,
}

impl AppState {
    pub fn new(planner: TripPlanner, store: Arc<dyn TripStore>) -> Self {
        Self {
            planner: Arc::new(planner),
            store,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/generate-trip", post(routes::generate_trip))
        .route("/trips", get(routes::list_trips))
        .route(
            "/trips/:id",
            get(routes::get_trip).delete(routes::delete_trip),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run_serve(state: AppState, bind: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address `{bind}`"))?;

    info!("trip planner listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("trip planner shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
