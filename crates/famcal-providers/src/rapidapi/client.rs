//! RapidAPI holidays HTTP client.

use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::raw::RawHoliday;
use crate::source::{BoxFuture, HolidayRequest, HolidaySource};

use super::config::RapidApiConfig;

const PROVIDER_NAME: &str = "rapidapi";

/// Holidays API client.
#[derive(Debug)]
pub struct RapidApiClient {
    http_client: reqwest::Client,
    config: RapidApiConfig,
}

impl RapidApiClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: RapidApiConfig) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ProviderError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_provider(PROVIDER_NAME)
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &RapidApiConfig {
        &self.config
    }

    async fn get_holidays(&self, request: HolidayRequest) -> ProviderResult<Vec<RawHoliday>> {
        let url = self
            .config
            .holidays_url(&request.country, request.year)
            .map_err(|e| ProviderError::bad_request(format!("invalid request URL: {}", e)))?;

        debug!(url = %url, "fetching holidays");

        let mut builder = self.http_client.get(url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::timeout("request timeout")
            } else if e.is_connect() {
                ProviderError::network(format!("connection failed: {}", e))
            } else {
                ProviderError::network(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok());
            return Err(ProviderError::rate_limited(format!(
                "rate limit exceeded{}",
                retry_after
                    .map(|s| format!(", retry after {} seconds", s))
                    .unwrap_or_default()
            )));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ProviderError::authentication(format!(
                "API key rejected ({})",
                status
            )));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::not_found(format!(
                "no holidays for {} in {}",
                request.country, request.year
            )));
        }

        if status == reqwest::StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::bad_request(format!("API rejected request: {}", body)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::server(format!("API error ({}): {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        let holidays = parse_holidays_body(&body)?;
        debug!(count = holidays.len(), country = %request.country, "received holidays");
        Ok(holidays)
    }
}

impl HolidaySource for RapidApiClient {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn fetch_holidays(
        &self,
        request: HolidayRequest,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawHoliday>>> {
        Box::pin(async move {
            self.get_holidays(request)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}

/// Decodes a response body into raw entries.
///
/// A JSON `null` body counts as an empty answer.
///
/// # Errors
///
/// Returns an invalid-response error when the body is not a JSON array of
/// holiday entries.
pub fn parse_holidays_body(body: &str) -> ProviderResult<Vec<RawHoliday>> {
    let parsed: Option<Vec<RawHoliday>> = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("failed to parse response: {}", e)).with_source(e)
    })?;
    Ok(parsed.unwrap_or_default())
}
