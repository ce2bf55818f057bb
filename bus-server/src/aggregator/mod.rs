//! Concurrent multi-provider search.
//!
//! One round dispatches the same criteria to every registered provider at
//! once, waits for all of them, and merges whatever came back. A provider
//! that fails is reported and contributes nothing; it never fails the round.

mod aggregate;
mod rank;

#[cfg(test)]
mod aggregate_tests;

pub use aggregate::{AggregateError, Aggregator, ProviderOutcome, ProviderReport, Round};
pub use rank::rank_offers;
