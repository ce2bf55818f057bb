//! Provider-neutral route offers.
//!
//! Every provider, synthetic or live, converts its results into
//! [`RouteOffer`] so the aggregator can merge and rank them together.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Location;

/// Currency every offer in this domain is priced in.
pub const CURRENCY: &str = "INR";

/// A bus company, as seen through one booking platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusOperator {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub rating: f64,

    /// Platform tag of the source that listed this operator
    pub platform: String,
}

/// A class of bus (sleeper, seater, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusType {
    pub id: String,
    pub name: String,

    /// Seat capacity (zero when the provider does not say)
    pub seats: u32,
    pub amenities: Vec<String>,
    pub description: String,
}

/// Fare for one offer, stamped with the platform it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency: String,

    /// Display name of the source provider
    pub platform: String,
}

impl Price {
    /// A fare in the domain currency.
    pub fn new(amount: f64, platform: impl Into<String>) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            platform: platform.into(),
        }
    }
}

/// One bookable bus route option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOffer {
    pub id: String,
    pub from: Location,
    pub to: Location,
    pub operator: BusOperator,
    pub bus_type: BusType,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,

    /// Human-readable journey length (e.g., "8h 0m")
    pub duration: String,
    pub price: Price,
    pub available_seats: u32,
    pub booking_url: String,
}

/// Turn a display name into an identifier ("Volvo AC" -> "volvo_ac").
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}
