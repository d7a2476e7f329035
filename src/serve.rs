//! HTTP service exposing the scanner.
//!
//! - `POST /remediate-array` scans a JSON array of code units
//! - `GET /health` reports liveness and the rule identifier

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::detect::{CodeUnit, ScanResult, Scanner, RULE_ID};

/// Build the application router.
pub fn build_router(scanner: Scanner) -> Router {
    Router::new()
        .route("/remediate-array", post(remediate_array))
        .route("/health", get(health))
        .with_state(Arc::new(scanner))
}

/// POST /remediate-array: scan a batch, return units with findings
pub async fn remediate_array(
    State(scanner): State<Arc<Scanner>>,
    Json(units): Json<Vec<CodeUnit>>,
) -> Result<Json<Vec<ScanResult>>, (StatusCode, String)> {
    debug!(units = units.len(), "scan request");

    let results = tokio::task::spawn_blocking(move || scanner.scan_batch(&units))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    debug!(flagged = results.len(), "scan complete");
    Ok(Json(results))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "rule": RULE_ID }))
}

/// Run the HTTP service until interrupted.
pub async fn run(addr: &str, scanner: Scanner) -> anyhow::Result<()> {
    let app = build_router(scanner);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("binding {}: {}", addr, e))?;

    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
    }
}
