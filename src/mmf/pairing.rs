//! Naive pairwise grouping of a pool into match proposals
//!
//! Tickets are consumed two at a time in the order the pool was returned.
//! An odd trailing ticket is left for the next run.

use crate::pb::openmatch::{Match, Ticket};
use crate::types::MATCH_FUNCTION_NAME;
use crate::utils::match_id;

/// Lazily produce the proposals of one run, in scan order
pub fn proposals<'a>(
    profile_name: &'a str,
    run_timestamp: &'a str,
    tickets: &'a [Ticket],
) -> impl Iterator<Item = Match> + 'a {
    tickets
        .chunks_exact(2)
        .enumerate()
        .map(move |(index, pair)| Match {
            match_id: match_id(profile_name, run_timestamp, index),
            match_profile: profile_name.to_string(),
            match_function: MATCH_FUNCTION_NAME.to_string(),
            tickets: pair.to_vec(),
        })
}

/// Group a pool into `len / 2` two-ticket proposals
pub fn pair_tickets(profile_name: &str, run_timestamp: &str, tickets: &[Ticket]) -> Vec<Match> {
    proposals(profile_name, run_timestamp, tickets).collect()
}
