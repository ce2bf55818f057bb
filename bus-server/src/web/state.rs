//! Application state for the web layer.

use std::sync::Arc;

use crate::aggregator::Aggregator;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The provider set every search round runs against
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}
