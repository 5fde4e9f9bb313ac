//! HTTP boundary layer.
//!
//! Thin glue around the orchestrator: validates input shape, resolves
//! topic/persona ids, and maps surfaced error kinds onto status codes.
//! Provider outages never reach this layer; the gateway has already
//! resolved them to placeholder text.

mod handlers;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::orchestrator::Orchestrator;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct ServerState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Builds the router exposing the dialogue endpoints.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/hypothetica/start", post(handlers::handle_start))
        .route("/hypothetica/turn", post(handlers::handle_turn))
        .route("/hypothetica/topics", get(handlers::handle_topics))
        .route("/hypothetica/personas", get(handlers::handle_personas))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the address and serves the router until the server exits.
pub async fn serve(addr: &str, state: ServerState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await
}
