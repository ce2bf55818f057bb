//! RapidAPI "transport-api" integration.
//!
//! Searches by city name and returns RFC 3339 timestamps. Only the clock
//! time on the provider's local offset is kept; it is anchored to the travel
//! date with the same overnight rule as every other provider.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime};
use serde::Deserialize;

use super::convert::{
    RecordConversionError, convert_records, require, resolve_endpoints, validate_fare,
    wire_bus_type, wire_operator,
};
use super::{BusProvider, ProviderError};
use crate::domain::{Price, ProviderIdentity, RouteOffer, Schedule, SearchCriteria, format_duration};
use crate::transport::{RateLimitedTransport, TransportConfig, TransportError, TransportRequest};

pub const DEFAULT_BASE_URL: &str = "https://transport-api.p.rapidapi.com";

const RAPIDAPI_HOST: &str = "transport-api.p.rapidapi.com";
const SEARCH_PATH: &str = "/bus/search";
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_RATING: f64 = 3.8;
const BOOKING_URL: &str = "https://example-booking.com/book";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    routes: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoute {
    id: String,
    operator: String,
    departure: String,
    arrival: String,
    price: f64,
    #[serde(default)]
    duration: String,
    bus_type: String,
    available_seats: u32,
    #[serde(default)]
    amenities: Vec<String>,
}

/// Clock time of an RFC 3339 timestamp, on the provider's local offset.
fn parse_clock_time(raw: &str) -> Result<NaiveTime, RecordConversionError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.time())
        .map_err(|_| RecordConversionError::InvalidTime(raw.to_string()))
}

/// Live provider backed by the RapidAPI transport API.
#[derive(Debug)]
pub struct TransportApiProvider {
    identity: ProviderIdentity,
    transport: RateLimitedTransport,
    rapidapi_key: String,
}

impl TransportApiProvider {
    pub fn new(rapidapi_key: impl Into<String>) -> Result<Self, TransportError> {
        Self::with_config(rapidapi_key, Self::default_config())
    }

    pub fn default_config() -> TransportConfig {
        TransportConfig::new(DEFAULT_BASE_URL).with_min_interval(DEFAULT_MIN_INTERVAL)
    }

    pub fn with_config(
        rapidapi_key: impl Into<String>,
        config: TransportConfig,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            identity: ProviderIdentity::live("Transport API", "rapidapi"),
            transport: RateLimitedTransport::new(config)?,
            rapidapi_key: rapidapi_key.into(),
        })
    }

    fn convert(
        &self,
        route: ApiRoute,
        criteria: &SearchCriteria,
    ) -> Result<RouteOffer, RecordConversionError> {
        let id = require(&route.id, "id")?;
        let operator = require(&route.operator, "operator")?;
        let bus_type = require(&route.bus_type, "busType")?;
        let fare = validate_fare(route.price)?;
        let (from, to) = resolve_endpoints(criteria)?;

        let schedule = Schedule::on(
            criteria.date(),
            parse_clock_time(&route.departure)?,
            parse_clock_time(&route.arrival)?,
        )
        .map_err(|e| RecordConversionError::InvalidTime(e.to_string()))?;

        let duration = match route.duration.trim() {
            "" => format_duration(schedule.duration()),
            label => label.to_string(),
        };

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
impl BusProvider for TransportApiProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<RouteOffer>, ProviderError> {
        let request = TransportRequest::get(SEARCH_PATH)
            .query("from", criteria.origin())
            .query("to", criteria.destination())
            .query("date", criteria.date().format("%Y-%m-%d").to_string())
            .query("passengers", criteria.passengers().to_string())
            .header("X-RapidAPI-Host", RAPIDAPI_HOST)
            .header("X-RapidAPI-Key", self.rapidapi_key.as_str());

        let bytes = self.transport.invoke(request).await?;

        let response: SearchResponse = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::envelope(e.to_string(), &bytes))?;

        let records = response.routes.unwrap_or_default();
        Ok(convert_records(records, &self.identity, |route: ApiRoute| {
            self.convert(route, criteria)
        }))
    }
}
