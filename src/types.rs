//! Common types and constants used throughout the matchmaking demo

use crate::pb::openmatch::{MatchProfile, Pool};

/// Unique identifier for tickets
pub type TicketId = String;

/// Pool every match function run requires
pub const EVERYONE_POOL: &str = "Everyone";

/// Name stamped on every proposal emitted by the match function
pub const MATCH_FUNCTION_NAME: &str = "first-match-mmf";

/// The only profile the profiles provider offers
pub const DEFAULT_PROFILE_NAME: &str = "1v1";

/// Port the services host listens on
pub const SERVICES_PORT: u16 = 50502;

/// Default logic service endpoint
pub const DEFAULT_MMLOGIC_ENDPOINT: &str = "http://om-mmlogic.open-match.svc.cluster.local:50503";

/// Default front door endpoint
pub const DEFAULT_FRONT_DOOR_ENDPOINT: &str =
    "http://om-front-door.open-match.svc.cluster.local:50520";

/// Port synthetic game servers are reachable on
pub const GAME_SERVER_PORT: u16 = 2222;

/// Build the fixed profile catalog: one `1v1` profile over the `Everyone` pool
pub fn default_profiles() -> Vec<MatchProfile> {
    vec![MatchProfile {
        name: DEFAULT_PROFILE_NAME.to_string(),
        pools: vec![Pool {
            name: EVERYONE_POOL.to_string(),
        }],
    }]
}

/// Outcome of a single match function run, as seen by metrics and the status sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunOutcome {
    Completed,
    Cancelled,
    Failed,
}

impl RunOutcome {
    /// Label used for metrics
    pub fn as_label(&self) -> &'static str {
        match self {
            RunOutcome::Completed => "completed",
            RunOutcome::Cancelled => "cancelled",
            RunOutcome::Failed => "failed",
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_catalog() {
        let profiles = default_profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "1v1");
        assert_eq!(profiles[0].pools.len(), 1);
        assert_eq!(profiles[0].pools[0].name, "Everyone");
    }

    #[test]
    fn test_run_outcome_labels() {
        assert_eq!(RunOutcome::Completed.to_string(), "completed");
        assert_eq!(RunOutcome::Cancelled.as_label(), "cancelled");
        assert_eq!(RunOutcome::Failed.as_label(), "failed");
    }
}
