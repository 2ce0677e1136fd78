//! Metrics and monitoring for the first-match demo
//!
//! This module provides Prometheus metrics collection and the HTTP health
//! endpoints for both the services host and the game client.

pub mod collector;
pub mod health;

pub use collector::{
    ClientMetrics, MatchFunctionMetrics, MetricsCollector, MetricsTimer, PipelineMetrics,
    ServiceMetrics,
};
pub use health::{HealthServer, HealthServerConfig};
