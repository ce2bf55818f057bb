//! Bus route aggregator server.
//!
//! Answers "which buses run from A to B on this date, cheapest first?" by
//! asking several booking platforms at once and merging their offers.

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod provider;
pub mod transport;
pub mod web;
