//! The first-match match function
//!
//! One run resolves the profile's pools through the logic service, requires
//! the `Everyone` pool, and streams pairwise proposals to the orchestrator.
//! A run ends in one of three ways:
//!
//! - completed: every proposal was sent and the summary went to the status sink
//! - cancelled: the consumer went away; a prefix of proposals may have been sent
//! - failed: pool resolution failed or the required pool was missing

use crate::error::MatchmakingError;
use crate::metrics::MetricsCollector;
use crate::mmf::pairing::proposals;
use crate::mmf::query::PoolQuerier;
use crate::pb::openmatch::{MatchProfile, RunResponse, Ticket};
use crate::status::StatusSink;
use crate::types::{RunOutcome, EVERYONE_POOL};
use crate::utils::{current_timestamp, format_run_timestamp};
use std::sync::Arc;
use tokio::sync::mpsc;
use tonic::Status;
use tracing::{debug, info, warn};

/// Sender half of a proposal stream
pub type ProposalSender = mpsc::Sender<Result<RunResponse, Status>>;

/// Source of the per-run timestamp
pub trait RunClock: Send + Sync {
    /// Current time formatted as `YYYY-MM-DDTHH:MM:SS.ss`
    fn run_timestamp(&self) -> String;
}

/// Wall clock in local time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl RunClock for SystemClock {
    fn run_timestamp(&self) -> String {
        format_run_timestamp(&current_timestamp())
    }
}

/// Match function pairing consecutive tickets of the `Everyone` pool
#[derive(Clone)]
pub struct FirstMatchFunction {
    querier: Arc<dyn PoolQuerier>,
    status: Arc<dyn StatusSink>,
    metrics: Arc<MetricsCollector>,
    clock: Arc<dyn RunClock>,
}

impl FirstMatchFunction {
    /// Create a match function using the system clock
    pub fn new(
        querier: Arc<dyn PoolQuerier>,
        status: Arc<dyn StatusSink>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            querier,
            status,
            metrics,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for run timestamps
    pub fn with_clock(mut self, clock: Arc<dyn RunClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Resolve the profile's pools and take the `Everyone` pool
    pub async fn resolve_pool(
        &self,
        profile: &MatchProfile,
    ) -> Result<Vec<Ticket>, MatchmakingError> {
        let mut pools = self
            .querier
            .query_pools(&profile.pools)
            .await
            .map_err(MatchmakingError::PoolQuery)?;

        pools
            .remove(EVERYONE_POOL)
            .ok_or_else(|| MatchmakingError::MissingPool {
                name: EVERYONE_POOL.to_string(),
            })
    }

    /// Execute one run, streaming proposals into `tx`
    ///
    /// Returns the number of proposals sent. A closed receiver means the
    /// consumer cancelled the call, reported as [`MatchmakingError::Cancelled`].
    pub async fn run(
        &self,
        profile: MatchProfile,
        tx: ProposalSender,
    ) -> Result<usize, MatchmakingError> {
        let timer = self.metrics.start_timer();
        let result = self.run_inner(&profile, &tx).await;

        let (outcome, sent) = match &result {
            Ok(sent) => (RunOutcome::Completed, *sent),
            Err(MatchmakingError::Cancelled { sent }) => (RunOutcome::Cancelled, *sent),
            Err(_) => (RunOutcome::Failed, 0),
        };
        self.metrics.record_run(outcome, sent, timer.stop());

        match &result {
            Ok(sent) => {
                self.status
                    .set(format!("Last run created {} matches", sent));
            }
            Err(MatchmakingError::Cancelled { sent }) => {
                warn!(profile = %profile.name, sent, "Match function run cancelled");
                self.status
                    .set(format!("Last run cancelled after {} matches", sent));
            }
            Err(e) => {
                warn!(profile = %profile.name, error = %e, "Match function run failed");
            }
        }

        result
    }

    async fn run_inner(
        &self,
        profile: &MatchProfile,
        tx: &ProposalSender,
    ) -> Result<usize, MatchmakingError> {
        let tickets = tokio::select! {
            resolved = self.resolve_pool(profile) => resolved?,
            _ = tx.closed() => return Err(MatchmakingError::Cancelled { sent: 0 }),
        };
        self.metrics.record_pool_size(tickets.len());

        let run_timestamp = self.clock.run_timestamp();
        debug!(
            profile = %profile.name,
            pool_size = tickets.len(),
            run_timestamp = %run_timestamp,
            "Scanning pool"
        );

        let mut sent = 0;
        for proposal in proposals(&profile.name, &run_timestamp, &tickets) {
            let response = RunResponse {
                proposal: Some(proposal),
            };
            if tx.send(Ok(response)).await.is_err() {
                return Err(MatchmakingError::Cancelled { sent });
            }
            sent += 1;
            self.metrics.record_proposal_sent();
        }

        info!(
            profile = %profile.name,
            pool_size = tickets.len(),
            proposals = sent,
            "Match function run completed"
        );
        Ok(sent)
    }
}
