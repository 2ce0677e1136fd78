//! Front-door wrapper messages and services (`wrapper` package)

use super::openmatch::{Assignment, Match, MatchProfile, Ticket};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FindMatchRequest {}

/// A frame of the `FindMatch` conversation. Only the last one matters.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FindMatchResponse {
    #[prost(enumeration = "find_match_response::State", tag = "1")]
    pub state: i32,
    #[prost(message, optional, tag = "2")]
    pub assignment: ::core::option::Option<Assignment>,
}

/// Nested types for [`FindMatchResponse`].
pub mod find_match_response {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum State {
        Unknown = 0,
        Pending = 1,
        Assigned = 2,
    }

    impl State {
        /// Wire name of the state, as the front door spells it.
        pub fn as_str_name(&self) -> &'static str {
            match self {
                State::Unknown => "UNKNOWN",
                State::Pending => "PENDING",
                State::Assigned => "ASSIGNED",
            }
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GenerateTicketRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GenerateTicketResponse {
    #[prost(message, optional, tag = "1")]
    pub ticket: ::core::option::Option<Ticket>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetProfilesRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetProfilesResponse {
    #[prost(message, repeated, tag = "1")]
    pub profiles: ::prost::alloc::vec::Vec<MatchProfile>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AllocateMatchRequest {
    #[prost(message, optional, tag = "1")]
    pub r#match: ::core::option::Option<Match>,
}

/// Assignment per ticket id.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AllocateMatchResponse {
    #[prost(map = "string, message", tag = "1")]
    pub ids_to_assignments: ::std::collections::HashMap<::prost::alloc::string::String, Assignment>,
}

include!(concat!(env!("OUT_DIR"), "/wrapper.TicketGenerator.rs"));
include!(concat!(env!("OUT_DIR"), "/wrapper.ProfilesProvider.rs"));
include!(concat!(env!("OUT_DIR"), "/wrapper.Allocater.rs"));
include!(concat!(env!("OUT_DIR"), "/wrapper.FrontDoor.rs"));
