//! RPC handlers of the services host
//!
//! One [`MatchmakingServices`] value backs all five endpoints the
//! orchestrator calls. Only the match function has real logic; the other
//! handlers are the minimum the platform needs:
//!
//! - ticket generator: an empty ticket, identity is filled in upstream
//! - profiles provider: the fixed `1v1` profile over `Everyone`
//! - allocator: one random game server shared by every ticket of the match
//! - evaluator: echo every proposal unchanged

use crate::error::MatchmakingError;
use crate::metrics::MetricsCollector;
use crate::mmf::FirstMatchFunction;
use crate::pb::openmatch::evaluator_server::Evaluator;
use crate::pb::openmatch::match_function_server::MatchFunction;
use crate::pb::openmatch::{
    Assignment, EvaluateRequest, EvaluateResponse, RunRequest, RunResponse, Ticket,
};
use crate::pb::wrapper::allocater_server::Allocater;
use crate::pb::wrapper::profiles_provider_server::ProfilesProvider;
use crate::pb::wrapper::ticket_generator_server::TicketGenerator;
use crate::pb::wrapper::{
    AllocateMatchRequest, AllocateMatchResponse, GenerateTicketRequest, GenerateTicketResponse,
    GetProfilesRequest, GetProfilesResponse,
};
use crate::types::default_profiles;
use crate::utils::random_connection_string;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status, Streaming};
use tracing::{debug, info, warn};

/// Proposals buffered between the match function and the transport
const PROPOSAL_BUFFER: usize = 16;

/// Evaluated matches buffered between the evaluator and the transport
const EVALUATION_BUFFER: usize = 16;

/// Handler set for the services host
#[derive(Clone)]
pub struct MatchmakingServices {
    match_function: FirstMatchFunction,
    metrics: Arc<MetricsCollector>,
}

impl MatchmakingServices {
    /// Create the handler set
    pub fn new(match_function: FirstMatchFunction, metrics: Arc<MetricsCollector>) -> Self {
        Self {
            match_function,
            metrics,
        }
    }
}

#[tonic::async_trait]
impl TicketGenerator for MatchmakingServices {
    async fn generate_ticket(
        &self,
        _request: Request<GenerateTicketRequest>,
    ) -> Result<Response<GenerateTicketResponse>, Status> {
        self.metrics.record_rpc("GenerateTicket", true);
        self.metrics.record_ticket_generated();

        Ok(Response::new(GenerateTicketResponse {
            ticket: Some(Ticket::default()),
        }))
    }
}

#[tonic::async_trait]
impl ProfilesProvider for MatchmakingServices {
    async fn get_profiles(
        &self,
        _request: Request<GetProfilesRequest>,
    ) -> Result<Response<GetProfilesResponse>, Status> {
        self.metrics.record_rpc("GetProfiles", true);
        self.metrics.record_profiles_served();

        Ok(Response::new(GetProfilesResponse {
            profiles: default_profiles(),
        }))
    }
}

#[tonic::async_trait]
impl Allocater for MatchmakingServices {
    async fn allocate_match(
        &self,
        request: Request<AllocateMatchRequest>,
    ) -> Result<Response<AllocateMatchResponse>, Status> {
        let Some(proposal) = request.into_inner().r#match else {
            self.metrics.record_rpc("AllocateMatch", false);
            return Err(MatchmakingError::InvalidRequest { field: "match" }.into());
        };

        let assignment = Assignment {
            connection: random_connection_string(),
            error: None,
        };

        let ids_to_assignments = proposal
            .tickets
            .iter()
            .map(|ticket| (ticket.id.clone(), assignment.clone()))
            .collect::<std::collections::HashMap<_, _>>();

        info!(
            match_id = %proposal.match_id,
            tickets = ids_to_assignments.len(),
            connection = %assignment.connection,
            "Match allocated"
        );
        self.metrics.record_rpc("AllocateMatch", true);
        self.metrics.record_allocation(ids_to_assignments.len());

        Ok(Response::new(AllocateMatchResponse { ids_to_assignments }))
    }
}

#[tonic::async_trait]
impl MatchFunction for MatchmakingServices {
    type RunStream = ReceiverStream<Result<RunResponse, Status>>;

    async fn run(
        &self,
        request: Request<RunRequest>,
    ) -> Result<Response<Self::RunStream>, Status> {
        let Some(profile) = request.into_inner().profile else {
            self.metrics.record_rpc("Run", false);
            return Err(MatchmakingError::InvalidRequest { field: "profile" }.into());
        };
        debug!(profile = %profile.name, pools = profile.pools.len(), "Match function run requested");

        let (tx, rx) = mpsc::channel(PROPOSAL_BUFFER);
        let match_function = self.match_function.clone();
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            match match_function.run(profile, tx.clone()).await {
                Ok(_) => metrics.record_rpc("Run", true),
                // Nobody is left to read a status
                Err(MatchmakingError::Cancelled { .. }) => metrics.record_rpc("Run", false),
                Err(e) => {
                    metrics.record_rpc("Run", false);
                    let status: Status = e.into();
                    if let Err(undelivered) = tx.send(Err(status)).await {
                        debug!(
                            error = ?undelivered.0.err(),
                            "Match function consumer went away before the failure was reported"
                        );
                    }
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}

#[tonic::async_trait]
impl Evaluator for MatchmakingServices {
    type EvaluateStream = ReceiverStream<Result<EvaluateResponse, Status>>;

    async fn evaluate(
        &self,
        request: Request<Streaming<EvaluateRequest>>,
    ) -> Result<Response<Self::EvaluateStream>, Status> {
        let mut inbound = request.into_inner();
        let (tx, rx) = mpsc::channel(EVALUATION_BUFFER);
        let metrics = self.metrics.clone();

        tokio::spawn(async move {
            let mut echoed = 0usize;
            loop {
                match inbound.message().await {
                    Ok(Some(req)) => {
                        let response = EvaluateResponse { r#match: req.r#match };
                        if tx.send(Ok(response)).await.is_err() {
                            warn!(echoed, "Evaluator consumer went away");
                            metrics.record_rpc("Evaluate", false);
                            return;
                        }
                        echoed += 1;
                        metrics.record_evaluated_match();
                    }
                    Ok(None) => break,
                    Err(status) => {
                        warn!(error = %status, "Evaluator input stream failed");
                        metrics.record_rpc("Evaluate", false);
                        if tx.send(Err(status)).await.is_err() {
                            debug!("Evaluator consumer went away before the failure was reported");
                        }
                        return;
                    }
                }
            }

            debug!(echoed, "Evaluation finished");
            metrics.record_rpc("Evaluate", true);
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }
}
