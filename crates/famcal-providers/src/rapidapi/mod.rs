//! RapidAPI public-holidays source.
//!
//! Fetches `GET {base_url}{year}/{country}` with the `x-rapidapi-key` and
//! `x-rapidapi-host` headers and decodes the JSON array of entries.
//!
//! # Example
//!
//! ```ignore
//! use famcal_providers::rapidapi::{RapidApiClient, RapidApiConfig};
//! use famcal_providers::{HolidayRequest, HolidaySource};
//!
//! let client = RapidApiClient::new(RapidApiConfig::default())?;
//! let raw = client.fetch_holidays(HolidayRequest::new("ES", 2025)).await?;
//! ```

mod client;
mod config;

pub use client::{RapidApiClient, parse_holidays_body};
pub use config::RapidApiConfig;
