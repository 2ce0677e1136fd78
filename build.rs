//! Generates tonic client and server stubs for the matchmaking RPC surface.
//!
//! Message types are hand-declared with `prost` derives in `src/pb`, so the
//! manual service builder is used and no `protoc` is required at build time.

use tonic_build::manual::{Builder, Method, MethodBuilder, Service};

const PROST_CODEC: &str = "tonic::codec::ProstCodec";

fn method(name: &str, route: &str, input: &str, output: &str) -> MethodBuilder {
    Method::builder()
        .name(name)
        .route_name(route)
        .input_type(input)
        .output_type(output)
        .codec_path(PROST_CODEC)
}

fn main() {
    let match_function = Service::builder()
        .name("MatchFunction")
        .package("openmatch")
        .method(
            method(
                "run",
                "Run",
                "crate::pb::openmatch::RunRequest",
                "crate::pb::openmatch::RunResponse",
            )
            .server_streaming()
            .build(),
        )
        .build();

    let evaluator = Service::builder()
        .name("Evaluator")
        .package("openmatch")
        .method(
            method(
                "evaluate",
                "Evaluate",
                "crate::pb::openmatch::EvaluateRequest",
                "crate::pb::openmatch::EvaluateResponse",
            )
            .client_streaming()
            .server_streaming()
            .build(),
        )
        .build();

    let mm_logic = Service::builder()
        .name("MmLogic")
        .package("openmatch")
        .method(
            method(
                "query_tickets",
                "QueryTickets",
                "crate::pb::openmatch::QueryTicketsRequest",
                "crate::pb::openmatch::QueryTicketsResponse",
            )
            .server_streaming()
            .build(),
        )
        .build();

    let ticket_generator = Service::builder()
        .name("TicketGenerator")
        .package("wrapper")
        .method(
            method(
                "generate_ticket",
                "GenerateTicket",
                "crate::pb::wrapper::GenerateTicketRequest",
                "crate::pb::wrapper::GenerateTicketResponse",
            )
            .build(),
        )
        .build();

    let profiles_provider = Service::builder()
        .name("ProfilesProvider")
        .package("wrapper")
        .method(
            method(
                "get_profiles",
                "GetProfiles",
                "crate::pb::wrapper::GetProfilesRequest",
                "crate::pb::wrapper::GetProfilesResponse",
            )
            .build(),
        )
        .build();

    let allocater = Service::builder()
        .name("Allocater")
        .package("wrapper")
        .method(
            method(
                "allocate_match",
                "AllocateMatch",
                "crate::pb::wrapper::AllocateMatchRequest",
                "crate::pb::wrapper::AllocateMatchResponse",
            )
            .build(),
        )
        .build();

    let front_door = Service::builder()
        .name("FrontDoor")
        .package("wrapper")
        .method(
            method(
                "find_match",
                "FindMatch",
                "crate::pb::wrapper::FindMatchRequest",
                "crate::pb::wrapper::FindMatchResponse",
            )
            .client_streaming()
            .server_streaming()
            .build(),
        )
        .build();

    Builder::new().compile(&[
        match_function,
        evaluator,
        mm_logic,
        ticket_generator,
        profiles_provider,
        allocater,
        front_door,
    ]);

    println!("cargo:rerun-if-changed=build.rs");
}
