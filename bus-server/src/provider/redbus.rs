//! RedBus partner API integration.
//!
//! Searches by provider city code and returns schedules as bare "HH:MM"
//! clock times, which are anchored to the travel date here.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::convert::{
    RecordConversionError, convert_records, require, resolve_endpoints, validate_fare,
    wire_bus_type, wire_operator,
};
use super::{BusProvider, ProviderError};
use crate::domain::{
    Price, ProviderIdentity, RouteOffer, Schedule, SearchCriteria, format_duration,
};
use crate::transport::{RateLimitedTransport, TransportConfig, TransportError, TransportRequest};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.redbus.com/v1";

const SEARCH_PATH: &str = "/routes/search";
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_RATING: f64 = 4.0;
const BOOKING_URL: &str = "https://redbus.com/bus-tickets";

/// RedBus identifiers for the cities we search.
const CITY_CODES: [(&str, &str); 4] = [
    ("Mumbai", "MUMBAI001"),
    ("Pune", "PUNE001"),
    ("Bangalore", "BANGALORE001"),
    ("Delhi", "DELHI001"),
];

fn city_code(city: &str) -> Option<&'static str> {
    CITY_CODES
        .iter()
        .find(|(name, _)| *name == city)
        .map(|(_, code)| *code)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    from_city_id: &'a str,
    to_city_id: &'a str,
    departure_date: String,
    passengers: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RedBusRoute {
    id: String,
    operator_name: String,
    bus_type: String,
    departure_time: String,
    arrival_time: String,
    #[serde(default)]
    duration: String,
    fare: f64,
    available_seats: u32,
    #[serde(default)]
    amenities: Vec<String>,
    #[serde(default)]
    boarding_points: Vec<String>,
    #[serde(default)]
    dropping_points: Vec<String>,
}

/// Live RedBus provider.
#[derive(Debug)]
pub struct RedBusProvider {
    identity: ProviderIdentity,
    transport: RateLimitedTransport,
}

impl RedBusProvider {
    /// Provider against the production API.
    pub fn new(api_key: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_config(Self::default_config(api_key))
    }

    /// Production transport settings; adjust before [`Self::with_config`].
    pub fn default_config(api_key: impl Into<String>) -> TransportConfig {
        TransportConfig::new(DEFAULT_BASE_URL)
            .with_api_key(api_key)
            .with_min_interval(DEFAULT_MIN_INTERVAL)
    }

    pub fn with_config(config: TransportConfig) -> Result<Self, TransportError> {
        Ok(Self {
            identity: ProviderIdentity::live("RedBus API", "redbus"),
            transport: RateLimitedTransport::new(config)?,
        })
    }

    fn convert(
        &self,
        route: RedBusRoute,
        criteria: &SearchCriteria,
    ) -> Result<RouteOffer, RecordConversionError> {
        let id = require(&route.id, "id")?;
        let operator = require(&route.operator_name, "operatorName")?;
        let bus_type = require(&route.bus_type, "busType")?;
        let fare = validate_fare(route.fare)?;
        let (from, to) = resolve_endpoints(criteria)?;

        let schedule =
            Schedule::parse_hhmm(criteria.date(), &route.departure_time, &route.arrival_time)
                .map_err(|e| RecordConversionError::InvalidTime(e.to_string()))?;

        let duration = match route.duration.trim() {
            "" => format_duration(schedule.duration()),
            label => label.to_string(),
        };

        if !route.boarding_points.is_empty() || !route.dropping_points.is_empty() {
            debug!(
                id,
                boarding = route.boarding_points.len(),
                dropping = route.dropping_points.len(),
                "ignoring boarding and dropping points"
            );
        }

        Ok(RouteOffer {
            id: id.to_string(),
            from,
            to,
            operator: wire_operator(operator, &self.identity, DEFAULT_RATING),
            bus_type: wire_bus_type(bus_type, route.amenities),
            departure_time: schedule.departure(),
            arrival_time: schedule.arrival(),
            duration,
            price: Price::new(fare, &self.identity.name),
            available_seats: route.available_seats,
            booking_url: format!("{BOOKING_URL}/{id}"),
        })
    }
}

#[async_trait]
impl BusProvider for RedBusProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RouteOffer>, ProviderError> {
        let (Some(from), Some(to)) = (
            city_code(criteria.origin()),
            city_code(criteria.destination()),
        ) else {
            debug!(
                provider = %self.identity,
                origin = criteria.origin(),
                destination = criteria.destination(),
                "no city code; no routes"
            );
            return Ok(Vec::new());
        };

        let body = SearchRequest {
            from_city_id: from,
            to_city_id: to,
            departure_date: criteria.date().format("%Y-%m-%d").to_string(),
            passengers: criteria.passengers(),
        };

        let bytes = self
            .transport
            .invoke(TransportRequest::post(SEARCH_PATH, &body))
            .await?;

        let response: SearchResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::envelope(e.to_string(), &bytes))?;

        if response.status.eq_ignore_ascii_case("error") {
            return Err(ProviderError::envelope("provider reported an error", &bytes));
        }

        let records = response.data.unwrap_or_default();
        Ok(convert_records(records, &self.identity, |route: RedBusRoute| {
            self.convert(route, criteria)
        }))
    }
}
