//! Embedded reference data.
//!
//! Family members, sample events and a sample holiday list are compiled into
//! the binary from `assets/mocks/`. [`fallback_holidays`] is the fixed set
//! served whenever a live fetch fails.

use chrono::NaiveDate;
use famcal_core::{FamilyEvent, FamilyMember, HolidayKind, HolidayRecord};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, ProviderResult};
use crate::raw::RawHoliday;
use crate::transform::transform_holidays;

const FAMILY_MEMBERS_JSON: &str = include_str!("../assets/mocks/family-members.json");
const EVENTS_JSON: &str = include_str!("../assets/mocks/events.json");
const HOLIDAYS_JSON: &str = include_str!("../assets/mocks/holidays.json");

/// Country of the fallback holiday set.
pub const FALLBACK_COUNTRY: &str = "ES";

/// The fixed holidays served when a live fetch fails.
///
/// Always the same two Spanish national holidays, regardless of the
/// requested country.
pub fn fallback_holidays() -> Vec<HolidayRecord> {
    let mut holidays = Vec::with_capacity(2);
    if let Some(date) = NaiveDate::from_ymd_opt(2025, 5, 1) {
        holidays.push(HolidayRecord::from_parts(
            "Labor Day",
            "International Workers' Day",
            FALLBACK_COUNTRY,
            "All",
            HolidayKind::National,
            date,
        ));
    }
    if let Some(date) = NaiveDate::from_ymd_opt(2025, 12, 6) {
        holidays.push(HolidayRecord::from_parts(
            "Constitution Day",
            "Spanish Constitution Day",
            FALLBACK_COUNTRY,
            "All",
            HolidayKind::National,
            date,
        ));
    }
    holidays
}

/// The embedded family members.
///
/// # Errors
///
/// Returns an invalid-response error if the embedded JSON is malformed.
pub fn family_members() -> ProviderResult<Vec<FamilyMember>> {
    parse_embedded("family-members.json", FAMILY_MEMBERS_JSON)
}

/// The embedded sample family events.
///
/// # Errors
///
/// Returns an invalid-response error if the embedded JSON is malformed.
pub fn family_events() -> ProviderResult<Vec<FamilyEvent>> {
    parse_embedded("events.json", EVENTS_JSON)
}

/// The embedded sample holiday list, transformed like a live answer.
///
/// # Errors
///
/// Returns an invalid-response error if the embedded JSON is malformed.
pub fn sample_holidays() -> ProviderResult<Vec<HolidayRecord>> {
    let raw: Vec<RawHoliday> = parse_embedded("holidays.json", HOLIDAYS_JSON)?;
    Ok(transform_holidays(&raw, FALLBACK_COUNTRY))
}

fn parse_embedded<T: DeserializeOwned>(name: &str, json: &str) -> ProviderResult<T> {
    serde_json::from_str(json).map_err(|e| {
        ProviderError::invalid_response(format!("malformed mock dataset {}: {}", name, e))
            .with_provider("mock")
            .with_source(e)
    })
}
