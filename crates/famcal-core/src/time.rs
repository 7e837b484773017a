//! Time types for family events.
//!
//! [`EventTime`] represents an event boundary which is either a specific
//! instant (stored as UTC) or an all-day calendar date. It travels through
//! JSON and the CLI as a single ISO-8601 string.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a recognised ISO-8601 date or timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date or timestamp: {value:?}")]
pub struct EventTimeParseError {
    /// The rejected input.
    pub value: String,
}

/// The start or end of a family event.
///
/// - **DateTime**: a specific point in time, stored in UTC
/// - **AllDay**: a date without a time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventTime {
    /// A specific datetime, stored in UTC.
    DateTime(DateTime<Utc>),
    /// An all-day date.
    AllDay(NaiveDate),
}

impl EventTime {
    /// Creates a new `EventTime::DateTime` from a UTC datetime.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }

    /// Creates a new `EventTime::DateTime` from a datetime in any timezone.
    pub fn from_local<Tz: TimeZone>(dt: DateTime<Tz>) -> Self {
        Self::DateTime(dt.with_timezone(&Utc))
    }

    /// Creates a new `EventTime::AllDay` from a date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self::AllDay(date)
    }

    /// Parses an ISO-8601 string.
    ///
    /// Accepted forms, in order:
    /// - `YYYY-MM-DD` (all-day)
    /// - RFC 3339 with offset, e.g. `2025-04-20T18:00:00+02:00`
    /// - naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`, interpreted as UTC
    pub fn parse(value: &str) -> Result<Self, EventTimeParseError> {
        let trimmed = value.trim();

        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self::AllDay(date));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::from_local(dt));
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(Self::DateTime(naive.and_utc()));
            }
        }

        Err(EventTimeParseError {
            value: value.to_string(),
        })
    }

    /// Returns `true` if this is an all-day time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Converts to a UTC datetime for comparison purposes.
    ///
    /// All-day dates map to midnight UTC.
    pub fn to_utc_datetime(&self) -> DateTime<Utc> {
        match self {
            Self::DateTime(dt) => *dt,
            Self::AllDay(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Returns the calendar date (UTC) of this time.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::DateTime(dt) => dt.date_naive(),
            Self::AllDay(date) => *date,
        }
    }

    /// Checks if this event time is before another event time.
    pub fn is_before(&self, other: &EventTime) -> bool {
        self.to_utc_datetime() < other.to_utc_datetime()
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::AllDay(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl FromStr for EventTime {
    type Err = EventTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EventTime {
    type Error = EventTimeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EventTime> for String {
    fn from(value: EventTime) -> Self {
        value.to_string()
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_utc_datetime().cmp(&other.to_utc_datetime())
    }
}
