//! Status reporting for the demo
//!
//! Handlers and the game client push one-line human readable updates here.
//! Updates arrive from unrelated RPC tasks, so implementations must be safe
//! under concurrent calls.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use tracing::info;

/// Sink for one-line status updates
///
/// Reporting is best-effort and infallible: a broken sink never aborts the
/// caller's work.
pub trait StatusSink: Send + Sync {
    /// Replace the current status line
    fn set(&self, status: String);
}

/// Thread-safe status board keeping the latest line
#[derive(Debug)]
pub struct StatusBoard {
    /// Component name attached to log lines
    component: &'static str,
    latest: RwLock<String>,
    updates: AtomicU64,
}

impl StatusBoard {
    /// Create an empty status board
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            latest: RwLock::new(String::new()),
            updates: AtomicU64::new(0),
        }
    }

    /// Latest status line (empty until the first update)
    pub fn latest(&self) -> String {
        match self.latest.read() {
            Ok(latest) => latest.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of updates received since creation
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }
}

impl StatusSink for StatusBoard {
    fn set(&self, status: String) {
        info!(component = self.component, "{}", status);

        // A poisoned lock still holds a usable string; keep reporting
        let mut latest = match self.latest.write() {
            Ok(latest) => latest,
            Err(poisoned) => poisoned.into_inner(),
        };
        *latest = status;
        self.updates.fetch_add(1, Ordering::Relaxed);
    }
}
