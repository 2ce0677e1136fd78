//! Metrics collection using Prometheus
//!
//! This module provides metrics for both halves of the demo: match function
//! runs and the stub pipeline stages on the services host, and `FindMatch`
//! outcomes on the client.

use crate::types::RunOutcome;
use anyhow::Result;
use prometheus::{
    Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Main metrics collector
#[derive(Clone)]
pub struct MetricsCollector {
    /// Prometheus registry
    registry: Arc<Registry>,

    /// Service-level metrics
    service_metrics: ServiceMetrics,

    /// Match function metrics
    match_function_metrics: MatchFunctionMetrics,

    /// Evaluator, allocator and stub metrics
    pipeline_metrics: PipelineMetrics,

    /// Game client metrics
    client_metrics: ClientMetrics,
}

/// Service-level metrics
#[derive(Clone)]
pub struct ServiceMetrics {
    /// Service start time as a unix timestamp
    pub start_time_seconds: IntGauge,

    /// RPCs served by method and status
    pub rpc_requests_total: IntCounterVec,
}

/// Match function metrics
#[derive(Clone)]
pub struct MatchFunctionMetrics {
    /// Runs by outcome (completed, cancelled, failed)
    pub runs_total: IntCounterVec,

    /// Proposals streamed to the orchestrator
    pub proposals_total: IntCounter,

    /// Proposals produced per completed run
    pub proposals_per_run: Histogram,

    /// Size of the last pool scanned
    pub last_pool_size: IntGauge,

    /// Time from request to stream completion
    pub run_duration_seconds: HistogramVec,
}

/// Evaluator, allocator and stub metrics
#[derive(Clone)]
pub struct PipelineMetrics {
    /// Matches echoed back by the evaluator
    pub evaluated_matches_total: IntCounter,

    /// Matches allocated a game server
    pub allocations_total: IntCounter,

    /// Tickets given an assignment
    pub tickets_assigned_total: IntCounter,

    /// Empty tickets minted for the platform
    pub tickets_generated_total: IntCounter,

    /// Profile catalog requests served
    pub profiles_served_total: IntCounter,
}

/// Game client metrics
#[derive(Clone)]
pub struct ClientMetrics {
    /// `FindMatch` conversations by result
    pub find_match_total: IntCounterVec,

    /// Duration of `FindMatch` conversations
    pub find_match_duration_seconds: Histogram,
}

impl MetricsCollector {
    /// Create a new metrics collector with default registry
    pub fn new() -> Result<Self> {
        let registry = Arc::new(Registry::new());
        Self::with_registry(registry)
    }

    /// Create a new metrics collector with custom registry
    pub fn with_registry(registry: Arc<Registry>) -> Result<Self> {
        let service_metrics = ServiceMetrics::new(&registry)?;
        let match_function_metrics = MatchFunctionMetrics::new(&registry)?;
        let pipeline_metrics = PipelineMetrics::new(&registry)?;
        let client_metrics = ClientMetrics::new(&registry)?;

        service_metrics
            .start_time_seconds
            .set(chrono::Utc::now().timestamp());

        Ok(Self {
            registry,
            service_metrics,
            match_function_metrics,
            pipeline_metrics,
            client_metrics,
        })
    }

    /// Get the Prometheus registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Get service metrics
    pub fn service(&self) -> &ServiceMetrics {
        &self.service_metrics
    }

    /// Get match function metrics
    pub fn match_function(&self) -> &MatchFunctionMetrics {
        &self.match_function_metrics
    }

    /// Get pipeline metrics
    pub fn pipeline(&self) -> &PipelineMetrics {
        &self.pipeline_metrics
    }

    /// Get client metrics
    pub fn client(&self) -> &ClientMetrics {
        &self.client_metrics
    }

    /// Record an RPC being served
    pub fn record_rpc(&self, method: &str, success: bool) {
        let status = if success { "ok" } else { "error" };
        self.service_metrics
            .rpc_requests_total
            .with_label_values(&[method, status])
            .inc();
    }

    /// Record the pool a match function run is about to scan
    pub fn record_pool_size(&self, size: usize) {
        self.match_function_metrics
            .last_pool_size
            .set(size as i64);
    }

    /// Record a single proposal sent downstream
    pub fn record_proposal_sent(&self) {
        self.match_function_metrics.proposals_total.inc();
    }

    /// Record the end of a match function run
    pub fn record_run(&self, outcome: RunOutcome, proposals: usize, duration: Duration) {
        self.match_function_metrics
            .runs_total
            .with_label_values(&[outcome.as_label()])
            .inc();

        if outcome == RunOutcome::Completed {
            self.match_function_metrics
                .proposals_per_run
                .observe(proposals as f64);
        }

        self.match_function_metrics
            .run_duration_seconds
            .with_label_values(&[outcome.as_label()])
            .observe(duration.as_secs_f64());
    }

    /// Record a match echoed by the evaluator
    pub fn record_evaluated_match(&self) {
        self.pipeline_metrics.evaluated_matches_total.inc();
    }

    /// Record an allocation covering `tickets` tickets
    pub fn record_allocation(&self, tickets: usize) {
        self.pipeline_metrics.allocations_total.inc();
        self.pipeline_metrics
            .tickets_assigned_total
            .inc_by(tickets as u64);
    }

    /// Record a ticket shell being generated
    pub fn record_ticket_generated(&self) {
        self.pipeline_metrics.tickets_generated_total.inc();
    }

    /// Record the profile catalog being served
    pub fn record_profiles_served(&self) {
        self.pipeline_metrics.profiles_served_total.inc();
    }

    /// Record a finished `FindMatch` conversation
    pub fn record_find_match(&self, result: &str, duration: Duration) {
        self.client_metrics
            .find_match_total
            .with_label_values(&[result])
            .inc();
        self.client_metrics
            .find_match_duration_seconds
            .observe(duration.as_secs_f64());
    }

    /// Create a timer for measuring operation duration
    pub fn start_timer(&self) -> MetricsTimer {
        MetricsTimer::new()
    }
}

/// Timer for measuring operation durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get the elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return the duration
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

impl ServiceMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let start_time_seconds = IntGauge::new(
            "first_match_start_time_seconds",
            "Service start time as a unix timestamp",
        )?;
        registry.register(Box::new(start_time_seconds.clone()))?;

        let rpc_requests_total = IntCounterVec::new(
            Opts::new("first_match_rpc_requests_total", "Total RPCs served"),
            &["method", "status"],
        )?;
        registry.register(Box::new(rpc_requests_total.clone()))?;

        Ok(Self {
            start_time_seconds,
            rpc_requests_total,
        })
    }
}

impl MatchFunctionMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let runs_total = IntCounterVec::new(
            Opts::new("first_match_mmf_runs_total", "Match function runs by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(runs_total.clone()))?;

        let proposals_total = IntCounter::new(
            "first_match_mmf_proposals_total",
            "Match proposals streamed downstream",
        )?;
        registry.register(Box::new(proposals_total.clone()))?;

        let proposals_per_run = Histogram::with_opts(
            HistogramOpts::new(
                "first_match_mmf_proposals_per_run",
                "Proposals produced per completed run",
            )
            .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]),
        )?;
        registry.register(Box::new(proposals_per_run.clone()))?;

        let last_pool_size = IntGauge::new(
            "first_match_mmf_last_pool_size",
            "Tickets in the most recently scanned pool",
        )?;
        registry.register(Box::new(last_pool_size.clone()))?;

        let run_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "first_match_mmf_run_duration_seconds",
                "Match function run duration",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(run_duration_seconds.clone()))?;

        Ok(Self {
            runs_total,
            proposals_total,
            proposals_per_run,
            last_pool_size,
            run_duration_seconds,
        })
    }
}

impl PipelineMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let evaluated_matches_total = IntCounter::new(
            "first_match_evaluated_matches_total",
            "Matches echoed by the evaluator",
        )?;
        registry.register(Box::new(evaluated_matches_total.clone()))?;

        let allocations_total = IntCounter::new(
            "first_match_allocations_total",
            "Matches allocated a game server",
        )?;
        registry.register(Box::new(allocations_total.clone()))?;

        let tickets_assigned_total = IntCounter::new(
            "first_match_tickets_assigned_total",
            "Tickets given an assignment",
        )?;
        registry.register(Box::new(tickets_assigned_total.clone()))?;

        let tickets_generated_total = IntCounter::new(
            "first_match_tickets_generated_total",
            "Ticket shells generated",
        )?;
        registry.register(Box::new(tickets_generated_total.clone()))?;

        let profiles_served_total = IntCounter::new(
            "first_match_profiles_served_total",
            "Profile catalog requests served",
        )?;
        registry.register(Box::new(profiles_served_total.clone()))?;

        Ok(Self {
            evaluated_matches_total,
            allocations_total,
            tickets_assigned_total,
            tickets_generated_total,
            profiles_served_total,
        })
    }
}

impl ClientMetrics {
    fn new(registry: &Registry) -> Result<Self> {
        let find_match_total = IntCounterVec::new(
            Opts::new(
                "first_match_find_match_total",
                "FindMatch conversations by result",
            ),
            &["result"],
        )?;
        registry.register(Box::new(find_match_total.clone()))?;

        let find_match_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "first_match_find_match_duration_seconds",
                "FindMatch conversation duration",
            )
            .buckets(vec![0.1, 0.5, 1.0, 5.0, 10.0, 30.0, 60.0, 300.0]),
        )?;
        registry.register(Box::new(find_match_duration_seconds.clone()))?;

        Ok(Self {
            find_match_total,
            find_match_duration_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        // Test that we can access all metric groups
        let _service = collector.service();
        let _mmf = collector.match_function();
        let _pipeline = collector.pipeline();
        let _client = collector.client();
        assert!(collector.service().start_time_seconds.get() > 0);
    }

    #[test]
    fn test_run_recording() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        collector.record_pool_size(5);
        collector.record_proposal_sent();
        collector.record_proposal_sent();
        collector.record_run(RunOutcome::Completed, 2, Duration::from_millis(3));
        collector.record_run(RunOutcome::Cancelled, 0, Duration::from_millis(1));

        let mmf = collector.match_function();
        assert_eq!(mmf.last_pool_size.get(), 5);
        assert_eq!(mmf.proposals_total.get(), 2);
        assert_eq!(mmf.runs_total.with_label_values(&["completed"]).get(), 1);
        assert_eq!(mmf.runs_total.with_label_values(&["cancelled"]).get(), 1);
        assert_eq!(mmf.proposals_per_run.get_sample_count(), 1);
    }

    #[test]
    fn test_pipeline_recording() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        collector.record_allocation(2);
        collector.record_allocation(2);
        collector.record_evaluated_match();
        collector.record_ticket_generated();
        collector.record_profiles_served();
        collector.record_rpc("AllocateMatch", true);

        let pipeline = collector.pipeline();
        assert_eq!(pipeline.allocations_total.get(), 2);
        assert_eq!(pipeline.tickets_assigned_total.get(), 4);
        assert_eq!(pipeline.evaluated_matches_total.get(), 1);
        assert_eq!(
            collector
                .service()
                .rpc_requests_total
                .with_label_values(&["AllocateMatch", "ok"])
                .get(),
            1
        );
    }

    #[test]
    fn test_find_match_recording() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");

        collector.record_find_match("assigned", Duration::from_millis(250));
        collector.record_find_match("receive_error", Duration::from_millis(10));

        let client = collector.client();
        assert_eq!(client.find_match_total.with_label_values(&["assigned"]).get(), 1);
        assert_eq!(client.find_match_duration_seconds.get_sample_count(), 2);
    }

    #[test]
    fn test_metrics_timer() {
        let collector = MetricsCollector::new().expect("Failed to create metrics collector");
        let timer = collector.start_timer();

        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.elapsed();

        assert!(duration >= Duration::from_millis(10));

        let final_duration = timer.stop();
        assert!(final_duration >= Duration::from_millis(10));
    }
}
