//! RawHoliday to HolidayRecord conversion pipeline.
//!
//! The transformation:
//! 1. Parses the raw date; entries with an unparseable date are skipped
//! 2. Classifies the holiday kind from its name
//! 3. Fills in country and location defaults
//! 4. Sorts the result by date, keeping source order for equal dates

use chrono::NaiveDate;
use famcal_core::{HolidayRecord, classify_holiday};
use tracing::warn;

use crate::raw::RawHoliday;

/// Location used when the source does not name one.
pub const DEFAULT_LOCATION: &str = "All";

/// Converts one [`RawHoliday`] into a [`HolidayRecord`].
///
/// Returns `None` (and logs a warning) when the date is not `YYYY-MM-DD`.
///
/// # Arguments
///
/// * `raw` - The raw entry from the holidays API
/// * `country` - Country code to use when the entry carries none
pub fn transform_holiday(raw: &RawHoliday, country: &str) -> Option<HolidayRecord> {
    let date = match NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => {
            warn!(name = %raw.name, date = %raw.date, error = %e, "skipping holiday with invalid date");
            return None;
        }
    };

    let country = raw
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(country);

    let location = raw
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOCATION);

    Some(HolidayRecord::from_parts(
        &raw.name,
        "",
        country,
        location,
        classify_holiday(&raw.name),
        date,
    ))
}

/// Converts raw entries into records sorted by date.
pub fn transform_holidays(raw: &[RawHoliday], country: &str) -> Vec<HolidayRecord> {
    let mut records: Vec<HolidayRecord> = raw
        .iter()
        .filter_map(|entry| transform_holiday(entry, country))
        .collect();
    sort_by_date(&mut records);
    records
}

/// Sorts records ascending by date. The sort is stable.
pub fn sort_by_date(records: &mut [HolidayRecord]) {
    records.sort_by_key(|record| record.date);
}

#[cfg(test)]
mod tests {
    use super::*;
    use famcal_core::{HolidayKind, Weekday};

    #[test]
    fn labor_day_scenario() {
        let raw = vec![RawHoliday::new("Labor Day", "2025-05-01").with_country("ES")];
        let records = transform_holidays(&raw, "ES");

        assert_eq!(records.len(), 1);
        let h = &records[0];
        assert_eq!(h.name, "Labor Day");
        assert_eq!(h.country, "ES");
        assert_eq!(h.location, "All");
        assert_eq!(h.kind, HolidayKind::Public);
        assert_eq!(h.description, "");
        assert_eq!((h.year.as_str(), h.month.as_str(), h.day.as_str()), ("2025", "05", "01"));
        assert_eq!(h.weekday, Weekday::Thursday);
    }

    #[test]
    fn kind_comes_from_name_not_api_type() {
        let mut raw = RawHoliday::new("Christmas Day", "2025-12-25");
        raw.kind = Some("Public".to_string());

        let h = transform_holiday(&raw, "ES").unwrap();
        assert_eq!(h.kind, HolidayKind::Religious);
    }

    #[test]
    fn keeps_source_location_and_inherits_country() {
        let raw = RawHoliday::new("Regional Day", "2025-06-09").with_location("Murcia");
        let h = transform_holiday(&raw, "ES").unwrap();

        assert_eq!(h.location, "Murcia");
        assert_eq!(h.country, "ES");
        assert_eq!(h.kind, HolidayKind::Regional);
    }

    #[test]
    fn invalid_dates_are_skipped() {
        let raw = vec![
            RawHoliday::new("Broken", "2025-02-30"),
            RawHoliday::new("Also broken", "soon"),
            RawHoliday::new("New Year", "2025-01-01"),
        ];
        let records = transform_holidays(&raw, "ES");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "New Year");
    }

    #[test]
    fn sorted_by_date_and_stable() {
        let raw = vec![
            RawHoliday::new("Christmas Day", "2025-12-25"),
            RawHoliday::new("Epiphany", "2025-01-06"),
            RawHoliday::new("First on Labor Day", "2025-05-01"),
            RawHoliday::new("Second on Labor Day", "2025-05-01"),
        ];
        let records = transform_holidays(&raw, "ES");
        let names: Vec<&str> = records.iter().map(|h| h.name.as_str()).collect();

        assert_eq!(
            names,
            ["Epiphany", "First on Labor Day", "Second on Labor Day", "Christmas Day"]
        );
        assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn derived_fields_agree_with_date() {
        let raw = vec![
            RawHoliday::new("Leap", "2024-02-29"),
            RawHoliday::new("Constitution Day", "2025-12-06"),
        ];
        for h in transform_holidays(&raw, "ES") {
            assert_eq!(h.iso_date(), h.date.format("%Y-%m-%d").to_string());
            assert_eq!(h.weekday, Weekday::of(h.date));
        }
    }
}
