//! Error types for the matchmaking services
//!
//! Setup and binary code uses anyhow; the RPC-facing paths use the typed
//! errors below so they can be mapped onto gRPC status codes.

use tonic::Status;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for the services host
#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    #[error("Expected pool named {name}.")]
    MissingPool { name: String },

    #[error("Request is missing its {field}")]
    InvalidRequest { field: &'static str },

    #[error("Pool query failed: {0}")]
    PoolQuery(Status),

    #[error("Run cancelled after {sent} proposals")]
    Cancelled { sent: usize },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}

impl From<MatchmakingError> for Status {
    fn from(err: MatchmakingError) -> Self {
        match err {
            MatchmakingError::MissingPool { .. } => Status::failed_precondition(err.to_string()),
            MatchmakingError::InvalidRequest { .. } => Status::invalid_argument(err.to_string()),
            MatchmakingError::PoolQuery(status) => status,
            MatchmakingError::Cancelled { .. } => Status::cancelled(err.to_string()),
            MatchmakingError::ConfigurationError { .. } | MatchmakingError::InternalError { .. } => {
                Status::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_missing_pool_status() {
        let status: Status = MatchmakingError::MissingPool {
            name: "Everyone".to_string(),
        }
        .into();
        assert_eq!(status.code(), Code::FailedPrecondition);
        assert_eq!(status.message(), "Expected pool named Everyone.");
    }

    #[test]
    fn test_pool_query_keeps_upstream_code() {
        let status: Status = MatchmakingError::PoolQuery(Status::unavailable("mmlogic down")).into();
        assert_eq!(status.code(), Code::Unavailable);
        assert_eq!(status.message(), "mmlogic down");
    }

    #[test]
    fn test_cancelled_status() {
        let status: Status = MatchmakingError::Cancelled { sent: 3 }.into();
        assert_eq!(status.code(), Code::Cancelled);
    }
}
