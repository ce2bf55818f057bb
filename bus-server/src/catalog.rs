//! Static sample data: locations, operators, and bus classes.
//!
//! Mock providers draw from these tables to synthesise offers, and live
//! adapters use them to resolve city names back to full locations. The
//! tables are built once and never change.

use std::sync::LazyLock;

use crate::domain::{BusOperator, BusType, Location};

static LOCATIONS: LazyLock<Vec<Location>> = LazyLock::new(|| {
    vec![
        location("mumbai", "Mumbai Central", "Mumbai", "Maharashtra", 19.0760, 72.8777),
        location("pune", "Pune Station", "Pune", "Maharashtra", 18.5204, 73.8567),
        location(
            "bangalore",
            "Bangalore Majestic",
            "Bangalore",
            "Karnataka",
            12.9716,
            77.5946,
        ),
        location("delhi", "Delhi ISBT", "Delhi", "Delhi", 28.7041, 77.1025),
    ]
});

static OPERATORS: LazyLock<Vec<BusOperator>> = LazyLock::new(|| {
    vec![
        operator("redbus", "RedBus", "redbus.png", 4.2),
        operator("makemytrip", "MakeMyTrip", "mmt.png", 4.0),
        operator("goibibo", "Goibibo", "goibibo.png", 3.9),
        operator("abhibus", "AbhiBus", "abhibus.png", 4.1),
    ]
});

static BUS_TYPES: LazyLock<Vec<BusType>> = LazyLock::new(|| {
    vec![
        bus_type(
            "ac_sleeper",
            "AC Sleeper",
            40,
            &["AC", "Sleeper", "Blanket", "Pillow"],
            "Air conditioned sleeper bus with comfortable berths",
        ),
        bus_type(
            "non_ac_seater",
            "Non-AC Seater",
            50,
            &["Pushback Seats", "Charging Point"],
            "Comfortable seater bus for day travel",
        ),
        bus_type(
            "volvo_ac",
            "Volvo AC",
            45,
            &["AC", "WiFi", "Entertainment", "USB Charging"],
            "Premium Volvo bus with luxury amenities",
        ),
    ]
});

fn location(id: &str, name: &str, city: &str, state: &str, lat: f64, lng: f64) -> Location {
    Location {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        country: "India".to_string(),
        lat,
        lng,
    }
}

fn operator(id: &str, name: &str, logo: &str, rating: f64) -> BusOperator {
    BusOperator {
        id: id.to_string(),
        name: name.to_string(),
        logo: logo.to_string(),
        rating,
        platform: id.to_string(),
    }
}

fn bus_type(id: &str, name: &str, seats: u32, amenities: &[&str], description: &str) -> BusType {
    BusType {
        id: id.to_string(),
        name: name.to_string(),
        seats,
        amenities: amenities.iter().map(|a| (*a).to_string()).collect(),
        description: description.to_string(),
    }
}

/// All known locations.
pub fn locations() -> &'static [Location] {
    &LOCATIONS
}

/// All known bus classes.
pub fn bus_types() -> &'static [BusType] {
    &BUS_TYPES
}

/// Find the location serving a city (exact, case-sensitive name match).
pub fn find_location(city: &str) -> Option<&'static Location> {
    LOCATIONS.iter().find(|loc| loc.serves(city))
}

/// Find an operator by identifier.
pub fn find_operator(id: &str) -> Option<&'static BusOperator> {
    OPERATORS.iter().find(|op| op.id == id)
}

/// Find a bus class by display name, ignoring case.
pub fn find_bus_type(name: &str) -> Option<&'static BusType> {
    BUS_TYPES
        .iter()
        .find(|bt| bt.name.eq_ignore_ascii_case(name.trim()))
}
