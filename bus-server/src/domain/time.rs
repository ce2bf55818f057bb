//! Schedule time handling for provider responses.
//!
//! Providers describe departures and arrivals as "HH:MM" strings relative to
//! the travel date. This module turns those clock times into absolute
//! timestamps, handling overnight journeys whose arrival falls on the
//! following day.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Error returned when a time cannot be parsed or normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Parse a clock time in strict "HH:MM" format.
///
/// # Examples
///
/// ```
/// use bus_server::domain::parse_hhmm;
///
/// assert!(parse_hhmm("00:00").is_ok());
/// assert!(parse_hhmm("23:59").is_ok());
///
/// assert!(parse_hhmm("9:30").is_err());
/// assert!(parse_hhmm("24:00").is_err());
/// assert!(parse_hhmm("12-30").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    if s.len() != 5 {
        return Err(TimeError::new("expected HH:MM format"));
    }

    let bytes = s.as_bytes();

    if bytes[2] != b':' {
        return Err(TimeError::new("expected colon at position 2"));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits"))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 0-23"));
    }

    let minute =
        parse_two_digits(&bytes[3..5]).ok_or_else(|| TimeError::new("invalid minute digits"))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 0-59"));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time"))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// A normalized departure/arrival pair.
///
/// Departure is always at or before arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    departure: NaiveDateTime,
    arrival: NaiveDateTime,
}

impl Schedule {
    /// Anchor two clock times to a travel date.
    ///
    /// If the arrival clock time is earlier than the departure clock time,
    /// the journey runs overnight and arrival moves to the next day.
    ///
    /// # Examples
    ///
    /// ```
    /// use bus_server::domain::{Schedule, parse_hhmm};
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 8, 21).unwrap();
    /// let departure = parse_hhmm("22:30").unwrap();
    /// let arrival = parse_hhmm("06:15").unwrap();
    /// let schedule = Schedule::on(date, departure, arrival).unwrap();
    ///
    /// assert_eq!(schedule.departure().date(), date);
    /// assert_eq!(schedule.arrival().date(), NaiveDate::from_ymd_opt(2025, 8, 22).unwrap());
    /// ```
    pub fn on(
        date: NaiveDate,
        departure: NaiveTime,
        arrival: NaiveTime,
    ) -> Result<Self, TimeError> {
        let arrival_date = if arrival < departure {
            date.succ_opt()
                .ok_or_else(|| TimeError::new("date overflow"))?
        } else {
            date
        };

        Ok(Self {
            departure: date.and_time(departure),
            arrival: arrival_date.and_time(arrival),
        })
    }

    /// Parse two "HH:MM" strings and anchor them to a travel date.
    pub fn parse_hhmm(date: NaiveDate, departure: &str, arrival: &str) -> Result<Self, TimeError> {
        Self::on(date, parse_hhmm(departure)?, parse_hhmm(arrival)?)
    }

    /// Departure timestamp.
    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    /// Arrival timestamp.
    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    /// Time spent travelling.
    pub fn duration(&self) -> Duration {
        self.arrival.signed_duration_since(self.departure)
    }
}

/// Render a journey duration the way offers label it ("8h 0m").
///
/// # Examples
///
/// ```
/// use bus_server::domain::format_duration;
/// use chrono::Duration;
///
/// assert_eq!(format_duration(Duration::minutes(450)), "7h 30m");
/// assert_eq!(format_duration(Duration::hours(8)), "8h 0m");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes().max(0);
    format!("{}h {}m", total / 60, total % 60)
}
