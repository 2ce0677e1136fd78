//! Main application state and process coordination
//!
//! This module wires configuration, metrics, the status board and the health
//! server to the services host and/or the game client, and owns the shutdown
//! token every long-running task watches.

use crate::client::{GameClient, GameClientConfig};
use crate::config::AppConfig;
use crate::host::{bind, serve_with_listener, MatchmakingServices};
use crate::metrics::{HealthServer, HealthServerConfig, MetricsCollector};
use crate::mmf::{FirstMatchFunction, MmLogicPoolQuerier};
use crate::status::StatusBoard;
use anyhow::Result;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Service-level errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service initialization error: {message}")]
    Initialization { message: String },

    #[error("Background task error: {message}")]
    BackgroundTask { message: String },
}

/// Which halves of the demo this process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Services host only
    Services,
    /// Game client only
    Client,
    /// Both, in one process
    All,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Services => write!(f, "services"),
            RunMode::Client => write!(f, "client"),
            RunMode::All => write!(f, "all"),
        }
    }
}

/// Production application state
pub struct AppState {
    config: AppConfig,
    metrics: Arc<MetricsCollector>,
    status: Arc<StatusBoard>,
    health_server: Arc<HealthServer>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Build all shared components from configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let metrics = Arc::new(MetricsCollector::new().map_err(|e| {
            ServiceError::Initialization {
                message: format!("Failed to create metrics collector: {}", e),
            }
        })?);
        let status = Arc::new(StatusBoard::new("first-match"));

        let health_config = HealthServerConfig {
            port: config.service.health_port,
            service_name: config.service.name.clone(),
            ..Default::default()
        };
        let health_server = Arc::new(HealthServer::new(
            health_config,
            metrics.clone(),
            status.clone(),
        ));

        Ok(Self {
            config,
            metrics,
            status,
            health_server,
            shutdown: CancellationToken::new(),
        })
    }

    /// Token cancelled when the process should stop
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Shared status board
    pub fn status(&self) -> Arc<StatusBoard> {
        self.status.clone()
    }

    /// Shared metrics collector
    pub fn metrics(&self) -> Arc<MetricsCollector> {
        self.metrics.clone()
    }

    /// Run the selected halves until shutdown or a fatal error
    pub async fn run(&self, mode: RunMode) -> Result<()> {
        info!(mode = %mode, "Starting first-match");

        let health_task = {
            let health_server = self.health_server.clone();
            tokio::spawn(async move {
                if let Err(e) = health_server.start().await {
                    error!("Health server failed: {:#}", e);
                }
            })
        };

        let result = match mode {
            RunMode::Services => self.run_services().await,
            RunMode::Client => {
                self.health_server.readiness().store(true, Ordering::SeqCst);
                self.run_client().await;
                Ok(())
            }
            RunMode::All => {
                let (services, ()) = tokio::join!(self.run_services(), self.run_client());
                services
            }
        };

        // Stop whichever half is still running
        self.shutdown.cancel();
        self.health_server.stop();
        if let Err(e) = health_task.await {
            let err = ServiceError::BackgroundTask {
                message: format!("Health server task panicked: {}", e),
            };
            error!("{}", err);
        }

        result
    }

    /// Serve the five matchmaking endpoints until shutdown
    pub async fn run_services(&self) -> Result<()> {
        let result = self.serve().await;
        if result.is_err() {
            self.shutdown.cancel();
        }
        result
    }

    async fn serve(&self) -> Result<()> {
        let querier =
            MmLogicPoolQuerier::connect_lazy(&self.config.services_host.mmlogic_endpoint)?;
        let match_function = FirstMatchFunction::new(
            Arc::new(querier),
            self.status.clone(),
            self.metrics.clone(),
        );
        let services = Arc::new(MatchmakingServices::new(match_function, self.metrics.clone()));

        let listener = bind(self.config.services_host.listen_port).await?;
        self.health_server.readiness().store(true, Ordering::SeqCst);

        let shutdown = self.shutdown.clone();
        serve_with_listener(services, listener, async move { shutdown.cancelled().await }).await
    }

    /// Drive the game client loop until shutdown
    pub async fn run_client(&self) {
        let client = GameClient::new(
            GameClientConfig {
                front_door_endpoint: self.config.client.front_door_endpoint.clone(),
                menu_sleep: self.config.menu_sleep(),
                play_sleep: self.config.play_sleep(),
                connect_timeout: self.config.connect_timeout(),
            },
            self.status.clone(),
            self.metrics.clone(),
        );

        client.run(self.shutdown.clone()).await;
    }
}
