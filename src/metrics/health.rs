//! Health check endpoints and Prometheus metrics server
//!
//! This module provides HTTP endpoints for liveness, readiness, the latest
//! status line and Prometheus metrics using Axum.

use crate::metrics::collector::MetricsCollector;
use crate::status::StatusBoard;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Health server configuration
#[derive(Debug, Clone)]
pub struct HealthServerConfig {
    /// Port to bind the health server to
    pub port: u16,
    /// Host to bind to (typically "0.0.0.0" for all interfaces)
    pub host: String,
    /// Service name reported by the endpoints
    pub service_name: String,
}

impl Default for HealthServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            service_name: "first-match".to_string(),
        }
    }
}

/// Shared state for the health server
#[derive(Clone)]
pub struct HealthServerState {
    pub service_name: String,
    pub metrics_collector: Arc<MetricsCollector>,
    pub status: Arc<StatusBoard>,
    /// Set once the main workload is serving
    pub ready: Arc<AtomicBool>,
}

/// Health server that provides HTTP endpoints for monitoring
pub struct HealthServer {
    config: HealthServerConfig,
    state: HealthServerState,
    /// Cancellation is sticky, so a stop issued before `start` still applies
    shutdown: CancellationToken,
}

impl HealthServer {
    /// Create a new health server
    pub fn new(
        config: HealthServerConfig,
        metrics_collector: Arc<MetricsCollector>,
        status: Arc<StatusBoard>,
    ) -> Self {
        Self {
            state: HealthServerState {
                service_name: config.service_name.clone(),
                metrics_collector,
                status,
                ready: Arc::new(AtomicBool::new(false)),
            },
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Handle used to flip readiness
    pub fn readiness(&self) -> Arc<AtomicBool> {
        self.state.ready.clone()
    }

    /// Start the health server
    pub async fn start(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .context("Invalid health server address")?;

        let app = self.create_router();
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind health server on {}", addr))?;

        info!("Health server listening on http://{}", addr);

        let shutdown = self.shutdown.clone();

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("Health server shutdown signal received");
            })
            .await?;

        info!("Health server stopped");
        Ok(())
    }

    /// Create the Axum router with all health endpoints
    fn create_router(&self) -> Router {
        Router::new()
            .route("/", get(root_handler))
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .route("/status", get(status_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(self.state.clone())
    }

    /// Stop the health server
    pub fn stop(&self) {
        info!("Stopping health server...");
        self.shutdown.cancel();
    }
}

/// Root endpoint handler - shows service information
async fn root_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    Json(json!({
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/health", "/ready", "/status", "/metrics"]
    }))
}

/// Liveness endpoint handler; the process answering is enough
async fn health_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    debug!("Health check requested");

    Json(json!({
        "status": "healthy",
        "service": state.service_name,
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness endpoint handler
async fn ready_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    debug!("Readiness check requested");

    if state.ready.load(Ordering::SeqCst) {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Not ready")
    }
}

/// Latest status line endpoint handler
async fn status_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    Json(json!({
        "service": state.service_name,
        "status": state.status.latest(),
        "updates": state.status.update_count(),
        "timestamp": chrono::Utc::now()
    }))
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<HealthServerState>) -> impl IntoResponse {
    debug!("Metrics endpoint requested");

    let metric_families = state.metrics_collector.registry().gather();
    let encoder = TextEncoder::new();

    match encoder.encode_to_string(&metric_families) {
        Ok(metrics_output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, encoder.format_type().to_string())],
            metrics_output,
        ),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain".to_string())],
                "Failed to encode metrics".to_string(),
            )
        }
    }
}
