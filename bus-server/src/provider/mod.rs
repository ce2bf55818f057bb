//! Bus route providers.
//!
//! Every source of offers implements [`BusProvider`], whether it synthesises
//! data locally or calls a live booking API. The aggregator only ever sees
//! the trait, so mock and live providers mix freely in one round.
//!
//! Provider outcomes follow one rule: a malformed record is skipped, and
//! only a failed call or an undecodable envelope fails the provider.

mod convert;
mod error;
mod mock;
mod redbus;
mod transport_api;

use async_trait::async_trait;

use crate::domain::{ProviderIdentity, RouteOffer, SearchCriteria};

pub use convert::RecordConversionError;
pub use error::ProviderError;
pub use mock::{MockProfile, MockProvider};
pub use redbus::RedBusProvider;
pub use transport_api::TransportApiProvider;

/// A source of bus route offers.
#[async_trait]
pub trait BusProvider: Send + Sync {
    /// Who this provider is; stamped into every offer it returns.
    fn identity(&self) -> &ProviderIdentity;

    /// Find offers matching the criteria.
    ///
    /// `Ok` with an empty list means "no routes". `Err` means the provider
    /// is unavailable for this round.
    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RouteOffer>, ProviderError>;
}
