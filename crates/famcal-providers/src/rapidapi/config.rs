//! RapidAPI source configuration.

use std::time::Duration;
use url::Url;

/// Configuration for the RapidAPI holidays source.
#[derive(Debug, Clone)]
pub struct RapidApiConfig {
    /// Base URL; always ends with `/` so paths can be joined onto it.
    pub base_url: Url,

    /// Value sent in the `x-rapidapi-host` header.
    pub host: String,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl RapidApiConfig {
    /// Default API host.
    pub const DEFAULT_HOST: &'static str = "public-holidays7.p.rapidapi.com";

    /// Default base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://public-holidays7.p.rapidapi.com/";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Creates a configuration for the given base URL and host.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>, host: impl Into<String>) -> Result<Self, url::ParseError> {
        let mut raw = base_url.as_ref().trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Self {
            base_url: Url::parse(&raw)?,
            host: host.into(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("famcal/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the URL for one country and year.
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn holidays_url(&self, country: &str, year: i32) -> Result<Url, url::ParseError> {
        self.base_url
            .join(&format!("{}/{}", year, urlencoding::encode(country)))
    }
}

impl Default for RapidApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(Self::DEFAULT_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            host: Self::DEFAULT_HOST.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("famcal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
