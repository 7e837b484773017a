//! Holiday sources and their collaborators.
//!
//! - [`HolidaySource`] - the trait every remote holiday backend implements
//! - [`RawHoliday`] - one entry as returned by the holidays API
//! - [`transform_holidays`] - converts raw entries into sorted [`HolidayRecord`]s
//! - [`TokenProvider`] - supplies and refreshes the API credential
//! - [`mock`] - embedded reference data and the fixed fallback holidays
//! - [`ProviderError`] - error types for source operations
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────┐     ┌──────────────────┐
//! │  TokenProvider   │────▶│   AuthHeaders    │
//! └──────────────────┘     └────────┬─────────┘
//!                                   │ HolidayRequest
//!                                   ▼
//!                         ┌──────────────────┐
//!                         │  HolidaySource   │  (RapidApiClient)
//!                         └────────┬─────────┘
//!                                  │ Vec<RawHoliday>
//!                                  ▼ transform_holidays()
//!                         ┌──────────────────┐
//!                         │  HolidayRecord   │  (sorted by date)
//!                         └──────────────────┘
//! ```
//!
//! [`HolidayRecord`]: famcal_core::HolidayRecord

pub mod error;
pub mod mock;
#[cfg(feature = "rapidapi")]
pub mod rapidapi;
pub mod raw;
pub mod source;
pub mod token;
pub mod transform;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use raw::RawHoliday;
pub use source::{BoxFuture, ErrorSource, HolidayRequest, HolidaySource};
pub use token::{ApiKey, ApiKeyProvider, AuthHeaders, KeyResolver, TokenProvider};
pub use transform::{sort_by_date, transform_holiday, transform_holidays};
