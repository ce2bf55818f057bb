//! Search criteria for one aggregation round.

use std::num::NonZeroU32;

use chrono::NaiveDate;
use serde::Serialize;

/// Error returned when search criteria fail validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CriteriaError {
    /// A city name was empty or whitespace
    #[error("{0} city is required")]
    MissingCity(&'static str),

    /// Passenger count was zero
    #[error("passenger count must be at least 1")]
    NoPassengers,
}

/// What the caller is looking for: a route on a date for some passengers.
///
/// Fields are private so a constructed value is always valid and never
/// changes during a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    origin: String,
    destination: String,
    date: NaiveDate,
    passengers: NonZeroU32,
}

impl SearchCriteria {
    /// Validate and build criteria.
    ///
    /// City names are trimmed; empty names and zero passengers are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::SearchCriteria;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 8, 21).unwrap();
    /// let criteria = SearchCriteria::new(" Mumbai ", "Pune", date, 2).unwrap();
    /// assert_eq!(criteria.origin(), "Mumbai");
    ///
    /// assert!(SearchCriteria::new("Mumbai", "", date, 2).is_err());
    /// assert!(SearchCriteria::new("Mumbai", "Pune", date, 0).is_err());
    /// ```
    pub fn new(
        origin: impl AsRef<str>,
        destination: impl AsRef<str>,
        date: NaiveDate,
        passengers: u32,
    ) -> Result<Self, CriteriaError> {
        let origin = origin.as_ref().trim();
        if origin.is_empty() {
            return Err(CriteriaError::MissingCity("origin"));
        }

        let destination = destination.as_ref().trim();
        if destination.is_empty() {
            return Err(CriteriaError::MissingCity("destination"));
        }

        let passengers = NonZeroU32::new(passengers).ok_or(CriteriaError::NoPassengers)?;

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            date,
            passengers,
        })
    }

    /// Origin city name.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Destination city name.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Travel date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Number of travelling passengers.
    pub fn passengers(&self) -> u32 {
        self.passengers.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 21).unwrap()
    }

    #[test]
    fn valid_criteria() {
        let criteria = SearchCriteria::new("Mumbai", "Pune", date(), 2).unwrap();
        assert_eq!(criteria.origin(), "Mumbai");
        assert_eq!(criteria.destination(), "Pune");
        assert_eq!(criteria.date(), date());
        assert_eq!(criteria.passengers(), 2);
    }

    #[test]
    fn reject_blank_cities() {
        assert_eq!(
            SearchCriteria::new("   ", "Pune", date(), 1),
            Err(CriteriaError::MissingCity("origin"))
        );
        assert_eq!(
            SearchCriteria::new("Mumbai", "", date(), 1),
            Err(CriteriaError::MissingCity("destination"))
        );
    }

    #[test]
    fn reject_zero_passengers() {
        let err = SearchCriteria::new("Mumbai", "Pune", date(), 0).unwrap_err();
        assert_eq!(err, CriteriaError::NoPassengers);
        assert_eq!(err.to_string(), "passenger count must be at least 1");
    }
}
