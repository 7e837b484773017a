//! Wiring of the service layer from the client configuration.

use std::sync::Arc;

use famcal_providers::{
    ApiKeyProvider, ErrorSource, HolidaySource, ProviderError, TokenProvider,
};
use famcal_service::{
    CalendarService, FileStore, HolidayCache, HolidayFetchService, KeyValueStore, LogJournal,
    normalize_country,
};
use tracing::{debug, warn};

use crate::config::{ApiSettings, ClientConfig};
use crate::error::ClientResult;

/// The calendar and its collaborators, built once per invocation.
pub struct App {
    config: ClientConfig,
    country: String,
    journal: LogJournal,
    calendar: CalendarService,
}

impl App {
    /// Opens the configured store file and builds the services on top of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store file exists but cannot be read.
    pub fn open(config: ClientConfig) -> ClientResult<Self> {
        let store = FileStore::open(config.store_path())?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Builds the services over an existing store, with the holiday source
    /// and API key taken from the configuration.
    pub fn with_store(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let source = build_source(&config.api);
        let tokens = Arc::new(build_tokens(&config.api));
        Self::with_parts(config, store, source, tokens)
    }

    /// Builds the services from explicit parts.
    pub fn with_parts(
        config: ClientConfig,
        store: Arc<dyn KeyValueStore>,
        source: Arc<dyn HolidaySource>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        let cache = Arc::new(HolidayCache::new(store.clone()));
        let fetcher = Arc::new(HolidayFetchService::new(cache, source, tokens));
        let calendar = CalendarService::new(fetcher, store.clone());
        let country = normalize_country(&config.country);

        Self {
            config,
            country,
            journal: LogJournal::new(store),
            calendar,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the selected country code.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Returns the calendar service.
    pub fn calendar(&self) -> &CalendarService {
        &self.calendar
    }

    /// Returns the holiday cache.
    pub fn cache(&self) -> &Arc<HolidayCache> {
        self.calendar.fetcher().cache()
    }

    /// Returns the journal over the store.
    ///
    /// Every returned handle shares the same append lock.
    pub fn journal(&self) -> LogJournal {
        self.journal.clone()
    }
}

fn build_tokens(api: &ApiSettings) -> ApiKeyProvider {
    let key = api.resolve_key().unwrap_or_else(|e| {
        // The resolver retries on the first fetch; the failure surfaces there.
        warn!(error = %e, source = %api.key_source(), "failed to resolve API key");
        None
    });
    if key.is_none() {
        debug!("no API key available, holidays will come from the fallback list");
    }

    let tokens = ApiKeyProvider::new(&api.host, key);
    match api.key_resolver() {
        Some(resolver) => tokens.with_resolver(resolver),
        None => tokens,
    }
}

#[cfg(feature = "rapidapi")]
fn build_source(api: &ApiSettings) -> Arc<dyn HolidaySource> {
    use famcal_providers::rapidapi::RapidApiClient;

    let client = api
        .to_rapidapi_config()
        .map_err(ProviderError::configuration)
        .and_then(RapidApiClient::new);
    match client {
        Ok(client) => Arc::new(client),
        Err(e) => {
            warn!(error = %e, "holidays API unavailable");
            Arc::new(ErrorSource::new("rapidapi", e))
        }
    }
}

#[cfg(not(feature = "rapidapi"))]
fn build_source(_api: &ApiSettings) -> Arc<dyn HolidaySource> {
    Arc::new(ErrorSource::new(
        "offline",
        ProviderError::configuration("built without the rapidapi feature"),
    ))
}
