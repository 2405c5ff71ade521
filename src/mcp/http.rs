//! # HTTP Server
//!
//! HTTP transport for MCP plus metrics and health checks.
//!
//! Provides endpoints:
//! - `POST /mcp` - one JSON-RPC message per request
//! - `/metrics` - Prometheus metrics in text format
//! - `/healthz` - Liveness probe (always returns 200)
//! - `/readyz` - Readiness probe (returns 200 once the server accepts calls)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use super::handler::McpServer;
use crate::constants::MCP_HTTP_PATH;
use crate::observability::metrics::REGISTRY;

#[derive(Debug)]
pub struct ServerState {
    pub mcp: McpServer,
    pub is_ready: AtomicBool,
}

impl ServerState {
    pub fn new(mcp: McpServer) -> Self {
        Self {
            mcp,
            is_ready: AtomicBool::new(false),
        }
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route(MCP_HTTP_PATH, post(mcp_handler))
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(host: &str, port: u16, state: Arc<ServerState>) -> anyhow::Result<()> {
    let app = router(Arc::clone(&state));

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;

    info!("MCP HTTP server listening on {addr}{MCP_HTTP_PATH}");
    state.is_ready.store(true, Ordering::Relaxed);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn mcp_handler(State(state): State<Arc<ServerState>>, body: String) -> Response {
    match state.mcp.handle_message(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain")],
            format!("Failed to encode metrics: {e}").into_bytes(),
        );
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        buffer,
    )
}

async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

async fn readyz_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    if state.is_ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
