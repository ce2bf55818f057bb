//! Data transfer objects for web requests and responses.

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog;
use crate::domain::{ProviderIdentity, ProviderKind, RouteOffer};

/// Body of `POST /search`.
///
/// Every field is optional at the wire level so that missing cities produce
/// our own error message rather than a decoder error.
#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub from_city: String,

    #[serde(default)]
    pub to_city: String,

    /// `YYYY-MM-DD` or RFC 3339; defaults to tomorrow
    pub date: Option<String>,

    /// Defaults to 1 when missing or below 1
    pub passengers: Option<i64>,
}

/// Query string of `GET /routes`.
#[derive(Debug, Default, Deserialize)]
pub struct RoutesQuery {
    #[serde(default)]
    pub from: String,

    #[serde(default)]
    pub to: String,

    pub date: Option<String>,

    /// Kept as text; anything unparseable means 1
    pub passengers: Option<String>,
}

/// Generic envelope: `{status, message, data?}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data,
        }
    }
}

/// Error envelope: `{status: "error", message}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
        }
    }
}

/// Result of a search round.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub search_id: String,
    pub routes: Vec<RouteOffer>,
    pub total_found: usize,

    /// Seconds with two decimals, e.g. "0.53s"
    pub search_time: String,
}

impl SearchResponse {
    pub fn new(routes: Vec<RouteOffer>, elapsed: Duration) -> Self {
        Self {
            status: "success",
            message: "Routes found successfully",
            search_id: format!("search_{}", Uuid::new_v4()),
            total_found: routes.len(),
            routes,
            search_time: format!("{:.2}s", elapsed.as_secs_f64()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
}

/// A city in the `/cities` listing.
#[derive(Debug, Serialize)]
pub struct CityResult {
    pub id: String,
    pub name: String,
    pub state: String,
}

impl CityResult {
    pub fn all() -> Vec<Self> {
        catalog::locations()
            .iter()
            .map(|loc| CityResult {
                id: loc.id.clone(),
                name: loc.city.clone(),
                state: loc.state.clone(),
            })
            .collect()
    }
}

/// A provider in the `/platforms` listing.
#[derive(Debug, Serialize)]
pub struct PlatformResult {
    pub name: String,
    pub platform: String,
    pub kind: ProviderKind,
    pub active: bool,
}

impl From<&ProviderIdentity> for PlatformResult {
    fn from(identity: &ProviderIdentity) -> Self {
        Self {
            name: identity.name.clone(),
            platform: identity.platform.clone(),
            kind: identity.kind,
            active: true,
        }
    }
}

/// Parse a travel date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|t| t.date_naive()))
}

/// The default travel date: tomorrow, local time.
pub fn tomorrow() -> NaiveDate {
    let today = Local::now().date_naive();
    today.succ_opt().unwrap_or(today)
}

/// Passenger count from a `/search` body; missing or below 1 means 1.
pub fn passengers_or_default(value: Option<i64>) -> u32 {
    value
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1)
}

/// Passenger count from a `/routes` query; unparseable or below 1 means 1.
pub fn passengers_from_query(value: Option<&str>) -> u32 {
    passengers_or_default(value.and_then(|v| v.trim().parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 8, 21);
        assert_eq!(parse_date("2025-08-21"), expected);
        assert_eq!(parse_date("2025-08-21T00:00:00Z"), expected);
        assert_eq!(parse_date("2025-08-21T23:30:00+05:30"), expected);
        assert_eq!(parse_date("21/08/2025"), None);
        assert_eq!(parse_date("2025-02-30"), None);
    }

    #[test]
    fn tomorrow_is_after_today() {
        assert!(tomorrow() > Local::now().date_naive());
    }

    #[test]
    fn passenger_defaults() {
        assert_eq!(passengers_or_default(None), 1);
        assert_eq!(passengers_or_default(Some(0)), 1);
        assert_eq!(passengers_or_default(Some(-3)), 1);
        assert_eq!(passengers_or_default(Some(4)), 4);

        assert_eq!(passengers_from_query(None), 1);
        assert_eq!(passengers_from_query(Some("two")), 1);
        assert_eq!(passengers_from_query(Some("0")), 1);
        assert_eq!(passengers_from_query(Some("3")), 3);
    }

    #[test]
    fn search_response_envelope() {
        let response = SearchResponse::new(Vec::new(), Duration::from_millis(534));
        assert_eq!(response.search_time, "0.53s");
        assert_eq!(response.total_found, 0);
        assert!(response.search_id.starts_with("search_"));
        assert_eq!(response.search_id.len(), "search_".len() + 36);
    }

    #[test]
    fn search_body_fields_are_optional() {
        let body: SearchBody = serde_json::from_str(r#"{"from_city": "Mumbai"}"#).unwrap();
        assert_eq!(body.from_city, "Mumbai");
        assert!(body.to_city.is_empty());
        assert!(body.date.is_none());
        assert!(body.passengers.is_none());
    }

    #[test]
    fn cities_come_from_catalog() {
        let cities = CityResult::all();
        assert_eq!(cities.len(), 4);
        assert_eq!(cities[0].id, "mumbai");
        assert_eq!(cities[0].name, "Mumbai");
        assert_eq!(cities[0].state, "Maharashtra");
    }

    #[test]
    fn envelope_omits_missing_data() {
        let json = serde_json::to_value(ApiResponse::<()>::success("ok", None)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "success", "message": "ok"}));
    }
}
