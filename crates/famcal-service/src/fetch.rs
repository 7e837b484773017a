//! Holiday fetch pipeline.
//!
//! ```text
//! cache hit? ──yes──▶ Cache
//!     │no
//!     ▼
//! credential valid? ──no──▶ refresh + store ──fail──▶ Fallback
//!     │yes
//!     ▼
//! HolidaySource::fetch_holidays ──error/empty──▶ Fallback
//!     │
//!     ▼
//! transform + sort ──▶ cache put ──▶ Live
//! ```
//!
//! Fallback data is never cached, so the next call tries the remote again.
//! Concurrent fetches for the same key are not coalesced; each may call the
//! remote and the last one to finish wins the cache slot.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, Utc};
use famcal_core::HolidayRecord;
use famcal_providers::mock::fallback_holidays;
use famcal_providers::{
    HolidayRequest, HolidaySource, ProviderResult, TokenProvider, transform_holidays,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::cache::HolidayCache;

/// Where a holiday batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Served from the holiday cache.
    Cache,
    /// Fetched from the remote source just now.
    Live,
    /// The fixed mock set, served because the fetch failed.
    Fallback,
}

impl DataOrigin {
    /// Returns the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Live => "live",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holidays together with their origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayBatch {
    pub origin: DataOrigin,
    pub records: Vec<HolidayRecord>,
}

impl HolidayBatch {
    fn fallback() -> Self {
        Self {
            origin: DataOrigin::Fallback,
            records: fallback_holidays(),
        }
    }

    /// Returns true if this is the fixed fallback set.
    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }
}

/// Normalizes a country code: trimmed and upper-case.
pub fn normalize_country(country: &str) -> String {
    country.trim().to_uppercase()
}

/// Fetches holidays through cache, credential, remote source and fallback.
pub struct HolidayFetchService {
    cache: Arc<HolidayCache>,
    source: Arc<dyn HolidaySource>,
    tokens: Arc<dyn TokenProvider>,
}

impl HolidayFetchService {
    /// Creates a service from its collaborators.
    pub fn new(
        cache: Arc<HolidayCache>,
        source: Arc<dyn HolidaySource>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            cache,
            source,
            tokens,
        }
    }

    /// Returns the holiday cache.
    pub fn cache(&self) -> &Arc<HolidayCache> {
        &self.cache
    }

    /// Holidays of `country` for the current year.
    ///
    /// Never fails: any problem yields the fallback set.
    pub async fn fetch_by_country(&self, country: &str) -> Vec<HolidayRecord> {
        self.fetch_tagged(country).await.records
    }

    /// Like [`fetch_by_country`](Self::fetch_by_country) but reports the origin.
    ///
    /// Cached under the country code.
    pub async fn fetch_tagged(&self, country: &str) -> HolidayBatch {
        let country = normalize_country(country);
        let year = Utc::now().year();
        self.fetch(country.clone(), &country, year).await
    }

    /// Holidays of `country` for an explicit `year`.
    ///
    /// Cached under `COUNTRY-YEAR`.
    pub async fn fetch_for_year(&self, country: &str, year: i32) -> HolidayBatch {
        let country = normalize_country(country);
        let key = format!("{}-{}", country, year);
        self.fetch(key, &country, year).await
    }

    async fn fetch(&self, key: String, country: &str, year: i32) -> HolidayBatch {
        if country.is_empty() {
            warn!("empty country code, using fallback holidays");
            return HolidayBatch::fallback();
        }

        if let Some(records) = self.cache.get(&key) {
            debug!(key = %key, count = records.len(), "serving cached holidays");
            return HolidayBatch {
                origin: DataOrigin::Cache,
                records,
            };
        }

        match self.fetch_live(country, year).await {
            Ok(records) if !records.is_empty() => {
                info!(country = %country, year, count = records.len(), "fetched holidays");
                self.cache.put(&key, records.clone());
                HolidayBatch {
                    origin: DataOrigin::Live,
                    records,
                }
            }
            Ok(_) => {
                warn!(country = %country, year, "no holidays returned, using fallback holidays");
                HolidayBatch::fallback()
            }
            Err(e) => {
                error!(
                    country = %country,
                    year,
                    code = %e.code(),
                    transient = e.is_transient(),
                    error = %e,
                    "holiday fetch failed, using fallback holidays"
                );
                HolidayBatch::fallback()
            }
        }
    }

    async fn fetch_live(&self, country: &str, year: i32) -> ProviderResult<Vec<HolidayRecord>> {
        if !self.tokens.is_valid() {
            debug!("API credential invalid, refreshing");
            let key = self.tokens.refresh().await?;
            self.tokens.store(key);
        }

        let request =
            HolidayRequest::new(country, year).with_headers(self.tokens.auth_headers());
        let raw = self.source.fetch_holidays(request).await?;
        debug!(source = self.source.name(), count = raw.len(), "received raw holidays");

        Ok(transform_holidays(&raw, country))
    }
}

impl fmt::Debug for HolidayFetchService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HolidayFetchService")
            .field("cache", &self.cache)
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}
