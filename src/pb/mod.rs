//! Wire types and RPC stubs for the matchmaking platform
//!
//! Messages are declared with `prost` derives; the tonic client and server
//! modules for each service are generated by `build.rs` and included here.

pub mod openmatch;
pub mod wrapper;

pub use prost::Message;
