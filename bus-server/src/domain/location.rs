//! Bus stations and the cities they serve.

use serde::{Deserialize, Serialize};

/// A city or bus station an offer departs from or arrives at.
///
/// `Location::default()` is the zero-valued location used when a mock
/// provider is asked about a city it has no table entry for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier (e.g., "mumbai")
    pub id: String,

    /// Station display name (e.g., "Mumbai Central")
    pub name: String,

    /// City the station serves
    pub city: String,

    /// State or region
    pub state: String,

    /// Country
    pub country: String,

    #[serde(rename = "latitude")]
    pub lat: f64,

    #[serde(rename = "longitude")]
    pub lng: f64,
}

impl Location {
    /// Whether this location serves the given city name.
    pub fn serves(&self, city: &str) -> bool {
        self.city == city
    }

    /// Whether this is the zero-valued placeholder location.
    pub fn is_unknown(&self) -> bool {
        self.id.is_empty()
    }
}
