//! The services host
//!
//! A single gRPC server exposing the ticket generator, profiles provider,
//! allocator, match function and evaluator the orchestrator calls into.

pub mod handlers;
pub mod server;

pub use handlers::MatchmakingServices;
pub use server::{bind, router, serve_with_listener};
