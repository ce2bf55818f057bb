//! Shared conversion from provider wire records to [`RouteOffer`]s.
//!
//! Live adapters decode their envelope with the record list left as raw
//! JSON, then convert each record on its own. A record that fails any step
//! is logged and skipped; the rest of the response still counts.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::catalog;
use crate::domain::{
    BusOperator, BusType, Location, ProviderIdentity, RouteOffer, SearchCriteria, slugify,
};

/// Why a single provider record was discarded.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordConversionError {
    /// The record did not match the expected shape
    #[error("malformed record: {0}")]
    Malformed(String),

    /// Failed to parse a time string
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// A required field was empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The searched city is not in the catalog
    #[error("unknown location: {0}")]
    UnknownLocation(String),

    /// Fare was negative or not a number
    #[error("invalid fare: {0}")]
    InvalidFare(f64),
}

/// Catalog locations for the searched origin and destination.
pub(crate) fn resolve_endpoints(
    criteria: &SearchCriteria,
) -> Result<(Location, Location), RecordConversionError> {
    let find = |city: &str| {
        catalog::find_location(city)
            .cloned()
            .ok_or_else(|| RecordConversionError::UnknownLocation(city.to_string()))
    };
    Ok((find(criteria.origin())?, find(criteria.destination())?))
}

/// Decode and convert each raw record, skipping the ones that fail.
pub(crate) fn convert_records<R, F>(
    raw: Vec<serde_json::Value>,
    provider: &ProviderIdentity,
    mut convert: F,
) -> Vec<RouteOffer>
where
    R: DeserializeOwned,
    F: FnMut(R) -> Result<RouteOffer, RecordConversionError>,
{
    let total = raw.len();
    let offers: Vec<RouteOffer> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let converted = serde_json::from_value::<R>(value)
                .map_err(|e| RecordConversionError::Malformed(e.to_string()))
                .and_then(&mut convert);
            match converted {
                Ok(offer) => Some(offer),
                Err(error) => {
                    debug!(provider = %provider, index, %error, "skipping record");
                    None
                }
            }
        })
        .collect();

    if offers.len() < total {
        debug!(
            provider = %provider,
            kept = offers.len(),
            skipped = total - offers.len(),
            "converted provider records"
        );
    }
    offers
}

/// Reject blank values for required text fields.
pub(crate) fn require<'a>(
    value: &'a str,
    field: &'static str,
) -> Result<&'a str, RecordConversionError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(RecordConversionError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

/// Accepts finite non-negative fares; a negative zero comes back as `0.0`.
pub(crate) fn validate_fare(fare: f64) -> Result<f64, RecordConversionError> {
    if fare.is_finite() && fare >= 0.0 {
        Ok(fare + 0.0)
    } else {
        Err(RecordConversionError::InvalidFare(fare))
    }
}

/// Operator as listed by a live provider.
pub(crate) fn wire_operator(name: &str, provider: &ProviderIdentity, rating: f64) -> BusOperator {
    BusOperator {
        id: slugify(name),
        name: name.to_string(),
        logo: String::new(),
        rating,
        platform: provider.platform.clone(),
    }
}

/// Bus class as listed by a live provider.
///
/// Known classes pick up capacity and description from the catalog. The
/// provider's own amenity list wins when it sends one.
pub(crate) fn wire_bus_type(name: &str, amenities: Vec<String>) -> BusType {
    match catalog::find_bus_type(name) {
        Some(known) => BusType {
            id: slugify(name),
            name: name.to_string(),
            seats: known.seats,
            amenities: if amenities.is_empty() {
                known.amenities.clone()
            } else {
                amenities
            },
            description: known.description.clone(),
        },
        None => BusType {
            id: slugify(name),
            name: name.to_string(),
            seats: 0,
            amenities,
            description: name.to_string(),
        },
    }
}
