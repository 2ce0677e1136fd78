//! First Match - a toy client and services host for the front-door wrapper API
//!
//! This crate provides the game client's `FindMatch` conversation and the
//! services host backing the pluggable matchmaking callbacks: ticket
//! generator, profiles provider, match function, evaluator and allocator.

pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod mmf;
pub mod pb;
pub mod service;
pub mod status;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use client::{find_match, FindMatchError};
pub use mmf::{FirstMatchFunction, PoolQuerier};
pub use status::{StatusBoard, StatusSink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
