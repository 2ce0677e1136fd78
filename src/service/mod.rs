//! Service layer for the first-match demo
//!
//! This module contains the application state, process coordination and
//! shutdown handling shared by both subcommands.

pub mod app;

pub use app::{AppState, RunMode, ServiceError};
