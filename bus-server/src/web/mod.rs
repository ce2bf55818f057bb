//! Web layer for the bus route aggregator.
//!
//! JSON endpoints for searching routes and listing the catalog and the
//! registered providers.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
