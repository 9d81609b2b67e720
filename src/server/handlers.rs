//! HTTP request handlers
//!
//! Contains handlers for all HTTP endpoints.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;
use tracing::{instrument, warn};

use super::AppState;
use crate::transformer::{PrometheusFormatter, CONTENT_TYPE};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    status: String,
    /// Application version
    version: String,
}

/// Root endpoint - displays basic info
pub async fn root(State(state): State<AppState>) -> Html<String> {
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Kibana Prometheus Exporter</title>
</head>
<body>
    <h1>Kibana Prometheus Exporter</h1>
    <p>Version: {}</p>
    <ul>
        <li><a href="/health">Health Check</a></li>
        <li><a href="/ready">Readiness Check</a></li>
        <li><a href="{}">Metrics</a></li>
    </ul>
</body>
</html>"#,
        env!("CARGO_PKG_VERSION"),
        state.config.server.path
    );
    Html(html)
}

/// Liveness endpoint - never touches Kibana
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness endpoint - succeeds when Kibana answers the status API with 200
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.collector.check_health().await {
        Ok(()) => (StatusCode::OK, "READY".to_string()),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, format!("NOT READY: {}", e))
        }
    }
}

/// Metrics endpoint - runs one collection pass and returns Prometheus format
#[instrument(skip(state), name = "metrics_handler")]
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let samples = state.collector.collect().await;
    let output = PrometheusFormatter::new().format(&samples);

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], output)
}
