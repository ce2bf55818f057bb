//! Fan-out/fan-in over registered providers.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{ProviderIdentity, RouteOffer, SearchCriteria};
use crate::provider::BusProvider;

/// Error that prevents a round from starting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("no providers registered")]
    NoProviders,

    /// Offers would be indistinguishable by `price.platform`
    #[error("duplicate provider name: {0}")]
    DuplicateProvider(String),
}

/// How one provider fared in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProviderOutcome {
    Succeeded { offers: usize },
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderReport {
    pub provider: ProviderIdentity,
    pub outcome: ProviderOutcome,
}

impl ProviderReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ProviderOutcome::Failed { .. })
    }
}

/// Result of one aggregation round.
///
/// `offers` is unranked; pass it through [`super::rank_offers`] before
/// presenting it. `reports` has exactly one entry per provider, in
/// registration order.
#[derive(Debug, Clone)]
pub struct Round {
    pub offers: Vec<RouteOffer>,
    pub reports: Vec<ProviderReport>,
}

impl Round {
    /// Reports for providers that contributed nothing because they failed.
    pub fn failures(&self) -> impl Iterator<Item = &ProviderReport> {
        self.reports.iter().filter(|r| r.is_failure())
    }
}

/// Dispatches searches to a fixed, ordered set of providers.
pub struct Aggregator {
    providers: Vec<Arc<dyn BusProvider>>,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn BusProvider>>) -> Self {
        Self { providers }
    }

    /// Identities of the registered providers, in registration order.
    pub fn providers(&self) -> impl Iterator<Item = &ProviderIdentity> {
        self.providers.iter().map(|p| p.identity())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn check_providers(&self) -> Result<(), AggregateError> {
        if self.providers.is_empty() {
            return Err(AggregateError::NoProviders);
        }

        let mut seen = HashSet::with_capacity(self.providers.len());
        for identity in self.providers() {
            if !seen.insert(identity.name.as_str()) {
                return Err(AggregateError::DuplicateProvider(identity.name.clone()));
            }
        }
        Ok(())
    }

    /// Run one round: query every provider concurrently and merge the
    /// offers of those that succeed.
    ///
    /// Waits for every provider; there is no round deadline. A round where
    /// every provider fails is still `Ok`, with no offers.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Round, AggregateError> {
        self.check_providers()?;

        let started = Instant::now();

        // One task per provider; each handle is that provider's result slot.
        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let criteria = criteria.clone();
                tokio::spawn(async move { provider.search(&criteria).await })
            })
            .collect();

        let results = join_all(handles).await;

        let mut offers = Vec::new();
        let mut reports = Vec::with_capacity(results.len());

        for (provider, joined) in self.providers.iter().zip(results) {
            let identity = provider.identity();
            let outcome = match joined {
                Ok(Ok(found)) => {
                    debug!(provider = %identity, offers = found.len(), "provider completed");
                    let count = found.len();
                    offers.extend(found);
                    ProviderOutcome::Succeeded { offers: count }
                }
                Ok(Err(error)) => {
                    warn!(provider = %identity, %error, "provider search failed");
                    ProviderOutcome::Failed {
                        error: error.to_string(),
                    }
                }
                Err(error) => {
                    warn!(provider = %identity, %error, "provider task did not complete");
                    ProviderOutcome::Failed {
                        error: format!("provider task did not complete: {error}"),
                    }
                }
            };
            reports.push(ProviderReport {
                provider: identity.clone(),
                outcome,
            });
        }

        let round = Round { offers, reports };
        info!(
            origin = criteria.origin(),
            destination = criteria.destination(),
            date = %criteria.date(),
            providers = round.reports.len(),
            failed = round.failures().count(),
            offers = round.offers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search round complete"
        );

        Ok(round)
    }
}
