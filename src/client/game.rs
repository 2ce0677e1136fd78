//! Toy game client loop
//!
//! Idles in the main menu, asks the front door for a match, then "plays" on
//! the assigned server before starting over.

use crate::client::find_match::find_match;
use crate::metrics::MetricsCollector;
use crate::status::StatusSink;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Timing and endpoint settings for the game client
#[derive(Debug, Clone)]
pub struct GameClientConfig {
    pub front_door_endpoint: String,
    pub menu_sleep: Duration,
    pub play_sleep: Duration,
    pub connect_timeout: Duration,
}

/// The toy game client
pub struct GameClient {
    config: GameClientConfig,
    status: Arc<dyn StatusSink>,
    metrics: Arc<MetricsCollector>,
}

impl GameClient {
    /// Create a new game client
    pub fn new(
        config: GameClientConfig,
        status: Arc<dyn StatusSink>,
        metrics: Arc<MetricsCollector>,
    ) -> Self {
        Self {
            config,
            status,
            metrics,
        }
    }

    /// Sleep unless cancelled first; returns false on cancellation
    async fn pause(&self, duration: Duration, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    /// One pass through menu, search and play
    ///
    /// Returns the assigned connection when a match was found.
    pub async fn run_once(&self, cancel: &CancellationToken) -> Option<String> {
        self.status.set("Main menu (sleeping)".to_string());
        if !self.pause(self.config.menu_sleep, cancel).await {
            return None;
        }

        self.status.set("Finding match".to_string());
        let timer = self.metrics.start_timer();
        let result = find_match(
            &self.config.front_door_endpoint,
            self.config.connect_timeout,
            cancel,
        )
        .await;

        let label = match &result {
            Ok(_) => "assigned",
            Err(e) => e.as_label(),
        };
        self.metrics.record_find_match(label, timer.stop());

        let connection = match result {
            Ok(connection) => {
                self.status
                    .set(format!("Playing match on {} (sleeping)", connection));
                Some(connection)
            }
            Err(e) => {
                warn!(error = %e, "FindMatch failed");
                self.status.set(format!("Error finding match: {}", e));
                None
            }
        };

        self.pause(self.config.play_sleep, cancel).await;
        connection
    }

    /// Repeat [`GameClient::run_once`] until cancelled
    pub async fn run(&self, cancel: CancellationToken) {
        info!(endpoint = %self.config.front_door_endpoint, "Game client started");

        while !cancel.is_cancelled() {
            self.run_once(&cancel).await;
        }

        info!("Game client stopped");
    }
}
