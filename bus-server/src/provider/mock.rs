//! Synthetic providers that generate plausible offers locally.
//!
//! Each [`MockProfile`] describes one booking platform's behaviour: how many
//! offers it returns, how slowly it answers, and how it prices and schedules
//! routes. A [`MockProvider`] turns a profile into randomised offers.

use std::ops::{Range, RangeInclusive};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{BusProvider, ProviderError};
use crate::catalog;
use crate::domain::{
    Location, Price, ProviderIdentity, RouteOffer, SearchCriteria, format_duration,
};

/// Minute offsets a mock departure may start at.
const DEPARTURE_MINUTES: [i64; 4] = [0, 15, 30, 45];

/// Generation parameters for one synthetic platform.
#[derive(Debug, Clone)]
pub struct MockProfile {
    pub identity: ProviderIdentity,

    /// Catalog operator every offer is attributed to
    pub operator_id: String,

    /// Prefix for offer identifiers ("redbus" -> "redbus_1")
    pub id_prefix: String,
    pub booking_url: String,

    /// How many offers one search returns
    pub offers: RangeInclusive<u32>,

    /// Simulated response time in milliseconds
    pub latency_ms: Range<u64>,

    /// Cheapest base fare; a random share of `price_spread` is added on top
    pub base_price: f64,
    pub price_spread: f64,

    /// Fare increase per subsequent offer
    pub price_step: f64,

    /// Hour of the first departure and hours between departures
    pub first_departure_hour: i64,
    pub departure_interval_hours: i64,

    pub journey: ChronoDuration,
    pub seats: RangeInclusive<u32>,
}

impl MockProfile {
    pub fn redbus() -> Self {
        Self {
            identity: ProviderIdentity::mock("RedBus", "redbus"),
            operator_id: "redbus".into(),
            id_prefix: "redbus".into(),
            booking_url: "https://redbus.in/book/route123".into(),
            offers: 2..=4,
            latency_ms: 200..700,
            base_price: 500.0,
            price_spread: 1000.0,
            price_step: 100.0,
            first_departure_hour: 6,
            departure_interval_hours: 4,
            journey: ChronoDuration::hours(8),
            seats: 5..=24,
        }
    }

    pub fn makemytrip() -> Self {
        Self {
            identity: ProviderIdentity::mock("MakeMyTrip", "makemytrip"),
            operator_id: "makemytrip".into(),
            id_prefix: "mmt".into(),
            booking_url: "https://makemytrip.com/bus/book/xyz".into(),
            offers: 1..=4,
            latency_ms: 300..900,
            base_price: 450.0,
            price_spread: 1200.0,
            price_step: 150.0,
            first_departure_hour: 7,
            departure_interval_hours: 3,
            journey: ChronoDuration::hours(9),
            seats: 3..=17,
        }
    }

    pub fn goibibo() -> Self {
        Self {
            identity: ProviderIdentity::mock("Goibibo", "goibibo"),
            operator_id: "goibibo".into(),
            id_prefix: "goibibo".into(),
            booking_url: "https://goibibo.com/bus/booking/abc".into(),
            offers: 2..=4,
            latency_ms: 250..650,
            base_price: 600.0,
            price_spread: 900.0,
            price_step: 80.0,
            first_departure_hour: 8,
            departure_interval_hours: 4,
            journey: ChronoDuration::minutes(7 * 60 + 30),
            seats: 8..=32,
        }
    }

    /// The three built-in platforms, in listing order.
    pub fn builtin() -> Vec<Self> {
        vec![Self::redbus(), Self::makemytrip(), Self::goibibo()]
    }

    pub fn with_offers(mut self, offers: RangeInclusive<u32>) -> Self {
        self.offers = offers;
        self
    }

    pub fn with_latency(mut self, latency_ms: Range<u64>) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Rename the platform, e.g. to run two copies of one profile.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.identity.name = name.into();
        self
    }
}

/// A provider that answers from a [`MockProfile`] without network access.
///
/// Never fails. Cities missing from the catalog come back as
/// `Location::default()`.
#[derive(Debug)]
pub struct MockProvider {
    profile: MockProfile,
    rng: Mutex<StdRng>,
}

impl MockProvider {
    pub fn new(profile: MockProfile) -> Self {
        Self::from_rng(profile, StdRng::from_os_rng())
    }

    /// Reproducible generation for a fixed seed.
    pub fn with_seed(profile: MockProfile, seed: u64) -> Self {
        Self::from_rng(profile, StdRng::seed_from_u64(seed))
    }

    fn from_rng(profile: MockProfile, rng: StdRng) -> Self {
        Self {
            profile,
            rng: Mutex::new(rng),
        }
    }

    fn latency(&self) -> Duration {
        let range = &self.profile.latency_ms;
        if range.is_empty() {
            return Duration::ZERO;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Duration::from_millis(rng.random_range(range.clone()))
    }

    /// Build one round's offers. Holds the RNG lock only while generating.
    fn generate(&self, criteria: &SearchCriteria) -> Vec<RouteOffer> {
        let profile = &self.profile;
        let from = lookup(criteria.origin());
        let to = lookup(criteria.destination());
        let operator = catalog::find_operator(&profile.operator_id)
            .cloned()
            .unwrap_or_default();
        let bus_types = catalog::bus_types();
        let midnight = criteria.date().and_time(NaiveTime::MIN);

        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let count = if profile.offers.is_empty() {
            0
        } else {
            rng.random_range(profile.offers.clone())
        };
        let base = profile.base_price + rng.random::<f64>() * profile.price_spread;

        (0..count)
            .map(|i| {
                let departure = departure_at(midnight, profile, i, &mut *rng);
                let bus_type = bus_types[rng.random_range(0..bus_types.len())].clone();
                let seats = if profile.seats.is_empty() {
                    *profile.seats.start()
                } else {
                    rng.random_range(profile.seats.clone())
                };

                RouteOffer {
                    id: format!("{}_{}", profile.id_prefix, i + 1),
                    from: from.clone(),
                    to: to.clone(),
                    operator: operator.clone(),
                    bus_type,
                    departure_time: departure,
                    arrival_time: departure + profile.journey,
                    duration: format_duration(profile.journey),
                    price: Price::new(
                        base + f64::from(i) * profile.price_step,
                        &profile.identity.name,
                    ),
                    available_seats: seats,
                    booking_url: profile.booking_url.clone(),
                }
            })
            .collect()
    }
}

fn lookup(city: &str) -> Location {
    catalog::find_location(city).cloned().unwrap_or_default()
}

fn departure_at(
    midnight: NaiveDateTime,
    profile: &MockProfile,
    index: u32,
    rng: &mut impl Rng,
) -> NaiveDateTime {
    let hours = profile.first_departure_hour + i64::from(index) * profile.departure_interval_hours;
    let minutes = DEPARTURE_MINUTES[rng.random_range(0..DEPARTURE_MINUTES.len())];
    midnight + ChronoDuration::hours(hours) + ChronoDuration::minutes(minutes)
}

#[async_trait]
impl BusProvider for MockProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.profile.identity
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RouteOffer>, ProviderError> {
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        Ok(self.generate(criteria))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    fn criteria(from: &str, to: &str) -> SearchCriteria {
        let date = NaiveDate::from_ymd_opt(2025, 8, 21).unwrap();
        SearchCriteria::new(from, to, date, 2).unwrap()
    }

    fn instant(profile: MockProfile) -> MockProvider {
        MockProvider::with_seed(profile.with_latency(0..0), 7)
    }

    #[tokio::test]
    async fn offer_count_within_profile_bounds() {
        for seed in 0..20 {
            let provider = MockProvider::with_seed(MockProfile::redbus().with_latency(0..0), seed);
            let offers = provider.search(&criteria("Mumbai", "Pune")).await.unwrap();
            assert!((2..=4).contains(&offers.len()), "got {}", offers.len());
        }
    }

    #[tokio::test]
    async fn offers_follow_profile_shape() {
        let provider = instant(MockProfile::redbus());
        let offers = provider.search(&criteria("Mumbai", "Pune")).await.unwrap();

        for (i, offer) in offers.iter().enumerate() {
            assert_eq!(offer.id, format!("redbus_{}", i + 1));
            assert_eq!(offer.from.id, "mumbai");
            assert_eq!(offer.to.id, "pune");
            assert_eq!(offer.operator.id, "redbus");
            assert_eq!(offer.price.platform, "RedBus");
            assert_eq!(offer.price.currency, "INR");
            assert_eq!(offer.duration, "8h 0m");
            assert_eq!(offer.arrival_time - offer.departure_time, ChronoDuration::hours(8));
            assert_eq!(offer.departure_time.hour() as usize, 6 + 4 * i);
            assert!(DEPARTURE_MINUTES.contains(&i64::from(offer.departure_time.minute())));
            assert!((5..=24).contains(&offer.available_seats));
            assert!((500.0..1500.0 + 300.0 + 1.0).contains(&offer.price.amount));
        }
    }

    #[tokio::test]
    async fn price_steps_per_offer() {
        let provider = instant(MockProfile::goibibo().with_offers(4..=4));
        let offers = provider.search(&criteria("Delhi", "Pune")).await.unwrap();

        assert_eq!(offers.len(), 4);
        for pair in offers.windows(2) {
            let step = pair[1].price.amount - pair[0].price.amount;
            assert!((step - 80.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn unknown_city_yields_empty_location() {
        let provider = instant(MockProfile::makemytrip().with_offers(1..=1));
        let offers = provider.search(&criteria("Atlantis", "Pune")).await.unwrap();

        assert_eq!(offers.len(), 1);
        assert!(offers[0].from.is_unknown());
        assert_eq!(offers[0].to.id, "pune");
    }

    #[tokio::test]
    async fn empty_offer_range_returns_nothing() {
        #[allow(clippy::reversed_empty_ranges)]
        let provider = instant(MockProfile::redbus().with_offers(3..=2));
        let offers = provider.search(&criteria("Mumbai", "Pune")).await.unwrap();
        assert!(offers.is_empty());
    }

    #[tokio::test]
    async fn same_seed_same_offers() {
        let a = instant(MockProfile::goibibo());
        let b = instant(MockProfile::goibibo());
        let c = criteria("Mumbai", "Bangalore");
        assert_eq!(a.search(&c).await.unwrap(), b.search(&c).await.unwrap());
    }

    #[tokio::test]
    async fn waits_for_simulated_latency() {
        let provider = MockProvider::with_seed(MockProfile::redbus().with_latency(50..60), 1);
        let start = tokio::time::Instant::now();
        provider.search(&criteria("Mumbai", "Pune")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn builtin_profiles_have_distinct_names() {
        let names: Vec<_> = MockProfile::builtin()
            .into_iter()
            .map(|p| p.identity.name)
            .collect();
        assert_eq!(names, ["RedBus", "MakeMyTrip", "Goibibo"]);

        let renamed = MockProfile::redbus().with_name("RedBus Mirror");
        assert_eq!(renamed.identity.name, "RedBus Mirror");
        assert_eq!(renamed.identity.platform, "redbus");
    }
}
