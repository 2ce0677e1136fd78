//! Match function for the first-match demo
//!
//! This module resolves pools through the logic service, groups the
//! `Everyone` pool into two-ticket proposals, and streams them back.

pub mod pairing;
pub mod query;
pub mod worker;

pub use pairing::{pair_tickets, proposals};
pub use query::{MmLogicPoolQuerier, PoolQuerier, PoolTickets};
pub use worker::{FirstMatchFunction, ProposalSender, RunClock, SystemClock};
