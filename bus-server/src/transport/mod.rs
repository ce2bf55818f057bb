//! Rate-limited HTTP transport for live provider integrations.
//!
//! Each live provider owns one [`RateLimitedTransport`]. The transport:
//! - spaces outbound calls at least `min_interval` apart per instance
//! - injects default headers and provider credentials
//! - classifies failures into encoding, transport, and protocol errors
//!
//! Nothing here retries; a failed call is final for that provider's round.

mod client;
mod error;
mod throttle;

pub use client::{RateLimitedTransport, TransportConfig, TransportRequest};
pub use error::TransportError;
pub use throttle::Throttle;
