//! Holiday records.
//!
//! A [`HolidayRecord`] is one public holiday for a country and date, in the
//! shape the calendar displays and caches. Records are built from their parts
//! by [`HolidayRecord::from_parts`], which derives the split date fields and
//! the weekday so they can never disagree with `date`.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Category of a holiday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayKind {
    National,
    Regional,
    Religious,
    Public,
    Other,
}

impl HolidayKind {
    /// Returns the display name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::National => "National",
            Self::Regional => "Regional",
            Self::Religious => "Religious",
            Self::Public => "Public",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword table used by [`classify_holiday`], checked in order.
const KIND_KEYWORDS: &[(&str, HolidayKind)] = &[
    ("national", HolidayKind::National),
    ("independence", HolidayKind::National),
    ("christmas", HolidayKind::Religious),
    ("easter", HolidayKind::Religious),
    ("regional", HolidayKind::Regional),
];

/// Classifies a holiday by case-insensitive keywords in its name.
///
/// Names matching no keyword are [`HolidayKind::Public`].
pub fn classify_holiday(name: &str) -> HolidayKind {
    let lower = name.to_lowercase();
    KIND_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, kind)| *kind)
        .unwrap_or(HolidayKind::Public)
}

/// Day of the week, serialized with its full English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Weekday of a calendar date.
    ///
    /// Plain date arithmetic with no time-zone shift; a date-only value is
    /// treated as a UTC date.
    pub fn of(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }

    /// Returns the full English name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One holiday entry for a country and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// Holiday name, e.g. "Labor Day".
    pub name: String,
    /// Free-form description; empty when the source has none.
    #[serde(default)]
    pub description: String,
    /// ISO country code.
    pub country: String,
    /// Region the holiday applies to ("All" for nationwide).
    pub location: String,
    /// Holiday category.
    #[serde(rename = "type")]
    pub kind: HolidayKind,
    /// Calendar date.
    pub date: NaiveDate,
    /// Four-digit year of `date`.
    pub year: String,
    /// Two-digit month of `date`.
    pub month: String,
    /// Two-digit day of `date`.
    pub day: String,
    /// Day of the week of `date`.
    pub weekday: Weekday,
}

impl HolidayRecord {
    /// Builds a record, deriving `year`, `month`, `day` and `weekday` from `date`.
    pub fn from_parts(
        name: impl Into<String>,
        description: impl Into<String>,
        country: impl Into<String>,
        location: impl Into<String>,
        kind: HolidayKind,
        date: NaiveDate,
    ) -> Self {
        let iso = date.format("%Y-%m-%d").to_string();
        let mut parts = iso.split('-').map(str::to_string);
        let year = parts.next().unwrap_or_default();
        let month = parts.next().unwrap_or_default();
        let day = parts.next().unwrap_or_default();

        Self {
            name: name.into(),
            description: description.into(),
            country: country.into(),
            location: location.into(),
            kind,
            date,
            year,
            month,
            day,
            weekday: Weekday::of(date),
        }
    }

    /// The date as `YYYY-MM-DD`.
    pub fn iso_date(&self) -> String {
        format!("{}-{}-{}", self.year, self.month, self.day)
    }

    /// The date as `DD/MM/YYYY`.
    pub fn display_date(&self) -> String {
        format!("{}/{}/{}", self.day, self.month, self.year)
    }

    /// Month number (1-12) of the holiday.
    pub fn month_number(&self) -> u32 {
        self.date.month()
    }
}
