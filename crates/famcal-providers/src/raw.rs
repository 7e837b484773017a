//! Raw holiday entries as returned by the holidays API.

use serde::{Deserialize, Serialize};

/// One holiday entry before transformation.
///
/// Only `name` and `date` are required. The API's own `type` field is kept
/// for inspection but the record kind is always derived from the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHoliday {
    /// Holiday name.
    pub name: String,
    /// Name in the country's language, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    /// Country code; missing entries inherit the requested country.
    #[serde(default, alias = "countryCode", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Date string, expected as `YYYY-MM-DD`.
    pub date: String,
    /// Region the holiday applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// The API's own category, unused by the transformer.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl RawHoliday {
    /// Creates a raw entry with only the required fields.
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local_name: None,
            country: None,
            date: date.into(),
            location: None,
            kind: None,
        }
    }

    /// Builder method to set the country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}
