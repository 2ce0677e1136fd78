//! Pool resolution against the logic service

use crate::pb::openmatch::mm_logic_client::MmLogicClient;
use crate::pb::openmatch::{Pool, QueryTicketsRequest, Ticket};
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::collections::HashMap;
use tonic::transport::{Channel, Endpoint};
use tonic::Status;
use tracing::debug;

/// Tickets per pool name
pub type PoolTickets = HashMap<String, Vec<Ticket>>;

/// Trait for materializing pool membership
#[async_trait]
pub trait PoolQuerier: Send + Sync {
    /// Resolve every pool into its tickets, keyed by pool name
    ///
    /// Pool order within each sequence is the order the logic service
    /// returned. Any failing pool fails the whole resolution.
    async fn query_pools(&self, pools: &[Pool]) -> std::result::Result<PoolTickets, Status>;
}

/// Pool querier backed by the `MmLogic` gRPC service
#[derive(Debug, Clone)]
pub struct MmLogicPoolQuerier {
    client: MmLogicClient<Channel>,
}

impl MmLogicPoolQuerier {
    /// Wrap an existing channel
    pub fn new(channel: Channel) -> Self {
        Self {
            client: MmLogicClient::new(channel),
        }
    }

    /// Create a querier whose channel connects on first use
    ///
    /// The services host must come up even when the logic service is not yet
    /// reachable, so connection errors surface per run instead of at startup.
    pub fn connect_lazy(endpoint: &str) -> Result<Self> {
        let channel = Endpoint::from_shared(endpoint.to_string())
            .with_context(|| format!("Invalid logic service endpoint: {}", endpoint))?
            .connect_lazy();
        Ok(Self::new(channel))
    }

    async fn query_pool(
        mut client: MmLogicClient<Channel>,
        pool: Pool,
    ) -> std::result::Result<(String, Vec<Ticket>), Status> {
        let mut stream = client
            .query_tickets(QueryTicketsRequest {
                pool: Some(pool.clone()),
            })
            .await?
            .into_inner();

        let mut tickets = Vec::new();
        while let Some(page) = stream.message().await? {
            tickets.extend(page.tickets);
        }

        debug!(pool = %pool.name, tickets = tickets.len(), "Pool resolved");
        Ok((pool.name, tickets))
    }
}

#[async_trait]
impl PoolQuerier for MmLogicPoolQuerier {
    async fn query_pools(&self, pools: &[Pool]) -> std::result::Result<PoolTickets, Status> {
        let queries = pools
            .iter()
            .cloned()
            .map(|pool| Self::query_pool(self.client.clone(), pool));

        // Later duplicates of a pool name overwrite earlier ones
        Ok(try_join_all(queries).await?.into_iter().collect())
    }
}
