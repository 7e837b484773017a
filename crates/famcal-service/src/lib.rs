//! Holiday caching, fetching and calendar orchestration.
//!
//! - [`KeyValueStore`] with [`FileStore`] and [`MemoryStore`] - durable string map
//! - [`HolidayCache`] - memory-first holiday cache mirrored to the store
//! - [`HolidayFetchService`] - cache, credential, remote source, fallback
//! - [`CalendarService`] - merged calendar view and family event editing
//! - [`LogJournal`] / [`JournalLayer`] - recent log events kept in the store
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use famcal_providers::{ApiKeyProvider, ErrorSource, ProviderError};
//! use famcal_service::{CalendarService, HolidayCache, HolidayFetchService, MemoryStore};
//!
//! # async fn run() {
//! let store = Arc::new(MemoryStore::new());
//! let cache = Arc::new(HolidayCache::new(store.clone()));
//! let source = Arc::new(ErrorSource::new("offline", ProviderError::network("offline")));
//! let tokens = Arc::new(ApiKeyProvider::new("public-holidays7.p.rapidapi.com", None));
//! let fetcher = Arc::new(HolidayFetchService::new(cache, source, tokens));
//!
//! let calendar = CalendarService::new(fetcher, store);
//! calendar.load("ES").await;
//! # }
//! ```

mod cache;
mod calendar;
mod error;
mod fetch;
mod journal;
mod store;
#[cfg(test)]
mod testing;

pub use cache::{HOLIDAY_KEY_PREFIX, HolidayCache, store_key};
pub use calendar::{CalendarService, EVENTS_KEY, LAST_UPDATE_KEY};
pub use error::{ServiceError, ServiceResult, StoreError, StoreResult};
pub use fetch::{DataOrigin, HolidayBatch, HolidayFetchService, normalize_country};
pub use journal::{JournalLayer, LOG_KEY, LogEntry, LogJournal};
pub use store::{FileStore, KeyValueStore, MemoryStore};
