//! Domain types for the bus route aggregator.
//!
//! These are the provider-neutral types every adapter converts into. Types
//! that carry invariants (criteria, schedules) enforce them at construction.

mod criteria;
mod identity;
mod location;
mod offer;
mod time;

pub use criteria::{CriteriaError, SearchCriteria};
pub use identity::{ProviderIdentity, ProviderKind};
pub use location::Location;
pub use offer::{BusOperator, BusType, CURRENCY, Price, RouteOffer, slugify};
pub use time::{Schedule, TimeError, format_duration, parse_hhmm};
