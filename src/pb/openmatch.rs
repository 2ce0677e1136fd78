//! Core platform messages and services (`openmatch` package)

/// A player's request to be matched.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ticket {
    /// Opaque identity assigned by the platform
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub assignment: ::core::option::Option<Assignment>,
}

/// Structured error carried inside an assignment.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AssignmentError {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}

/// Outcome of a successful match: where to connect, or why not.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Assignment {
    #[prost(string, tag = "1")]
    pub connection: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub error: ::core::option::Option<AssignmentError>,
}

/// A named bucket of tickets, resolved by the logic service.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Pool {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
}

/// Declares which pools a match function consults.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MatchProfile {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub pools: ::prost::alloc::vec::Vec<Pool>,
}

/// A tentative grouping of tickets.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Match {
    #[prost(string, tag = "1")]
    pub match_id: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub match_profile: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub match_function: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "4")]
    pub tickets: ::prost::alloc::vec::Vec<Ticket>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunRequest {
    #[prost(message, optional, tag = "1")]
    pub profile: ::core::option::Option<MatchProfile>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RunResponse {
    #[prost(message, optional, tag = "1")]
    pub proposal: ::core::option::Option<Match>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EvaluateRequest {
    #[prost(message, optional, tag = "1")]
    pub r#match: ::core::option::Option<Match>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EvaluateResponse {
    #[prost(message, optional, tag = "1")]
    pub r#match: ::core::option::Option<Match>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryTicketsRequest {
    #[prost(message, optional, tag = "1")]
    pub pool: ::core::option::Option<Pool>,
}

/// One page of pool membership.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryTicketsResponse {
    #[prost(message, repeated, tag = "1")]
    pub tickets: ::prost::alloc::vec::Vec<Ticket>,
}

include!(concat!(env!("OUT_DIR"), "/openmatch.MatchFunction.rs"));
include!(concat!(env!("OUT_DIR"), "/openmatch.Evaluator.rs"));
include!(concat!(env!("OUT_DIR"), "/openmatch.MmLogic.rs"));
