//! Round-level tests for the aggregator, using stub and mock providers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use httpmock::prelude::*;

use super::rank::offer;
use super::*;
use crate::domain::{ProviderIdentity, RouteOffer, SearchCriteria};
use crate::provider::{BusProvider, MockProfile, MockProvider, ProviderError, RedBusProvider};
use crate::transport::TransportError;

fn criteria() -> SearchCriteria {
    let date = NaiveDate::from_ymd_opt(2025, 8, 21).unwrap();
    SearchCriteria::new("Mumbai", "Pune", date, 2).unwrap()
}

enum Behaviour {
    Offers(Vec<f64>),
    Fail,
    Panic,
}

/// Provider with scripted behaviour for testing.
struct StubProvider {
    identity: ProviderIdentity,
    behaviour: Behaviour,
    delay: Duration,
    call_count: Mutex<usize>,
}

impl StubProvider {
    fn new(name: &str, behaviour: Behaviour) -> Self {
        Self {
            identity: ProviderIdentity::mock(name, name.to_lowercase()),
            behaviour,
            delay: Duration::ZERO,
            call_count: Mutex::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl BusProvider for StubProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    async fn search(&self, _criteria: &SearchCriteria) -> Result<Vec<RouteOffer>, ProviderError> {
        *self.call_count.lock().unwrap() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.behaviour {
            Behaviour::Offers(prices) => Ok(prices
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    let mut o = offer(&format!("{}_{i}", self.identity.platform), *p);
                    o.price.platform = self.identity.name.clone();
                    o
                })
                .collect()),
            Behaviour::Fail => Err(ProviderError::Transport(TransportError::Protocol {
                status: 500,
                body: "down".into(),
            })),
            Behaviour::Panic => panic!("stub provider panicked"),
        }
    }
}

fn aggregator(providers: Vec<Arc<dyn BusProvider>>) -> Aggregator {
    Aggregator::new(providers)
}

#[tokio::test]
async fn empty_provider_set_is_rejected() {
    let result = aggregator(vec![]).search(&criteria()).await;
    assert!(matches!(result, Err(AggregateError::NoProviders)));
}

#[tokio::test]
async fn duplicate_names_are_rejected_before_dispatch() {
    let a = Arc::new(StubProvider::new("Twin", Behaviour::Offers(vec![100.0])));
    let b = Arc::new(StubProvider::new("Twin", Behaviour::Offers(vec![200.0])));

    let result = aggregator(vec![a.clone() as Arc<dyn BusProvider>, b.clone()])
        .search(&criteria())
        .await;

    assert_eq!(
        result.unwrap_err(),
        AggregateError::DuplicateProvider("Twin".into())
    );
    assert_eq!(a.calls(), 0);
    assert_eq!(b.calls(), 0);
}

#[tokio::test]
async fn every_provider_reports_even_when_all_fail() {
    let round = aggregator(vec![
        Arc::new(StubProvider::new("A", Behaviour::Fail)),
        Arc::new(StubProvider::new("B", Behaviour::Fail)),
        Arc::new(StubProvider::new("C", Behaviour::Fail)),
    ])
    .search(&criteria())
    .await
    .unwrap();

    assert!(round.offers.is_empty());
    assert_eq!(round.reports.len(), 3);
    assert_eq!(round.failures().count(), 3);
    assert_eq!(
        round.reports[0].outcome,
        ProviderOutcome::Failed {
            error: "API error 500: down".into()
        }
    );
}

#[tokio::test]
async fn failures_do_not_affect_other_providers() {
    let round = aggregator(vec![
        Arc::new(StubProvider::new("Good", Behaviour::Offers(vec![900.0, 400.0]))),
        Arc::new(StubProvider::new("Bad", Behaviour::Fail)),
        Arc::new(StubProvider::new("Empty", Behaviour::Offers(vec![]))),
    ])
    .search(&criteria())
    .await
    .unwrap();

    assert_eq!(round.offers.len(), 2);
    assert_eq!(
        round.reports[0].outcome,
        ProviderOutcome::Succeeded { offers: 2 }
    );
    assert!(round.reports[1].is_failure());
    assert_eq!(
        round.reports[2].outcome,
        ProviderOutcome::Succeeded { offers: 0 }
    );
}

#[tokio::test]
async fn panicking_provider_is_reported_as_failed() {
    let round = aggregator(vec![
        Arc::new(StubProvider::new("Crashy", Behaviour::Panic)),
        Arc::new(StubProvider::new("Steady", Behaviour::Offers(vec![650.0]))),
    ])
    .search(&criteria())
    .await
    .unwrap();

    assert_eq!(round.offers.len(), 1);
    assert_eq!(round.offers[0].price.platform, "Steady");
    assert!(round.reports[0].is_failure());
    assert_eq!(round.reports[0].provider.name, "Crashy");
}

#[tokio::test]
async fn reports_follow_registration_order_not_completion_order() {
    let round = aggregator(vec![
        Arc::new(
            StubProvider::new("Slow", Behaviour::Offers(vec![1.0]))
                .with_delay(Duration::from_millis(80)),
        ),
        Arc::new(
            StubProvider::new("Medium", Behaviour::Offers(vec![2.0]))
                .with_delay(Duration::from_millis(40)),
        ),
        Arc::new(StubProvider::new("Fast", Behaviour::Offers(vec![3.0]))),
    ])
    .search(&criteria())
    .await
    .unwrap();

    let names: Vec<_> = round
        .reports
        .iter()
        .map(|r| r.provider.name.as_str())
        .collect();
    assert_eq!(names, ["Slow", "Medium", "Fast"]);
}

#[tokio::test]
async fn providers_run_concurrently() {
    let delay = Duration::from_millis(200);
    let providers: Vec<Arc<dyn BusProvider>> = ["A", "B", "C", "D"]
        .into_iter()
        .map(|name| {
            Arc::new(StubProvider::new(name, Behaviour::Offers(vec![1.0])).with_delay(delay))
                as Arc<dyn BusProvider>
        })
        .collect();

    let start = std::time::Instant::now();
    let round = aggregator(providers).search(&criteria()).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(round.offers.len(), 4);
    assert!(elapsed >= delay);
    assert!(elapsed < delay * 3, "providers ran serially: {elapsed:?}");
}

#[tokio::test]
async fn three_mock_platforms_mumbai_to_pune() {
    let providers: Vec<Arc<dyn BusProvider>> = MockProfile::builtin()
        .into_iter()
        .enumerate()
        .map(|(seed, profile)| {
            let profile = profile.with_offers(2..=4).with_latency(0..20);
            Arc::new(MockProvider::with_seed(profile, seed as u64)) as Arc<dyn BusProvider>
        })
        .collect();

    let round = aggregator(providers).search(&criteria()).await.unwrap();
    assert_eq!(round.reports.len(), 3);
    assert_eq!(round.failures().count(), 0);

    let ranked = rank_offers(round.offers);

    assert!(
        (6..=12).contains(&ranked.len()),
        "unexpected offer count {}",
        ranked.len()
    );
    for pair in ranked.windows(2) {
        assert!(pair[0].price.amount <= pair[1].price.amount);
    }
    for offer in &ranked {
        assert!(
            ["RedBus", "MakeMyTrip", "Goibibo"].contains(&offer.price.platform.as_str()),
            "unexpected platform {}",
            offer.price.platform
        );
        assert_eq!(offer.from.city, "Mumbai");
        assert_eq!(offer.to.city, "Pune");
    }
}

#[tokio::test]
async fn live_provider_error_is_a_warning_not_a_failure() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/routes/search");
            then.status(500).body("internal error");
        })
        .await;

    let config = RedBusProvider::default_config("key")
        .with_base_url(server.base_url())
        .with_min_interval(Duration::ZERO);
    let redbus = RedBusProvider::with_config(config).unwrap();

    let mut providers: Vec<Arc<dyn BusProvider>> = vec![Arc::new(redbus)];
    providers.extend(MockProfile::builtin().into_iter().map(|profile| {
        Arc::new(MockProvider::with_seed(
            profile.with_offers(1..=2).with_latency(0..0),
            42,
        )) as Arc<dyn BusProvider>
    }));

    let round = aggregator(providers).search(&criteria()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(round.reports.len(), 4);

    let failed: Vec<_> = round.failures().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].provider.name, "RedBus API");
    assert!(matches!(
        &failed[0].outcome,
        ProviderOutcome::Failed { error } if error.contains("500")
    ));

    assert!((3..=6).contains(&round.offers.len()));
    assert!(round.offers.iter().all(|o| o.price.platform != "RedBus API"));
}

#[test]
fn aggregator_lists_provider_identities() {
    let agg = aggregator(vec![
        Arc::new(StubProvider::new("One", Behaviour::Fail)),
        Arc::new(StubProvider::new("Two", Behaviour::Fail)),
    ]);
    let names: Vec<_> = agg.providers().map(|p| p.name.clone()).collect();
    assert_eq!(names, ["One", "Two"]);
    assert_eq!(agg.len(), 2);
    assert!(!agg.is_empty());
}
