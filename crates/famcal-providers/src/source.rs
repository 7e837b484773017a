//! HolidaySource trait definition.
//!
//! A [`HolidaySource`] is a remote backend that answers "which public
//! holidays does country X have in year Y". The production implementation is
//! [`RapidApiClient`](crate::rapidapi::RapidApiClient); tests use small fakes.

use std::future::Future;
use std::pin::Pin;

use crate::error::{ProviderError, ProviderResult};
use crate::raw::RawHoliday;
use crate::token::AuthHeaders;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe so the fetch service can hold an
/// `Arc<dyn HolidaySource>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One request for a country's holidays.
#[derive(Debug, Clone)]
pub struct HolidayRequest {
    /// Normalized (trimmed, upper-case) country code.
    pub country: String,
    /// Calendar year to query.
    pub year: i32,
    /// Credential headers to attach to the request.
    pub headers: AuthHeaders,
}

impl HolidayRequest {
    /// Creates a request with no credential headers.
    pub fn new(country: impl Into<String>, year: i32) -> Self {
        Self {
            country: country.into(),
            year,
            headers: AuthHeaders::default(),
        }
    }

    /// Builder method to set the credential headers.
    pub fn with_headers(mut self, headers: AuthHeaders) -> Self {
        self.headers = headers;
        self
    }
}

/// A backend that serves public holidays.
///
/// # Implementation Notes
///
/// - Implementations should be `Send + Sync` for use behind an `Arc`
/// - An empty `Vec` is a valid answer; the caller decides how to treat it
/// - Timeouts must surface as errors, never as an empty answer
pub trait HolidaySource: Send + Sync {
    /// Returns the name of this source (e.g., "rapidapi").
    fn name(&self) -> &str;

    /// Fetches the raw holiday entries for one country and year.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network errors, non-success statuses,
    /// timeouts and unparseable bodies.
    fn fetch_holidays(&self, request: HolidayRequest)
    -> BoxFuture<'_, ProviderResult<Vec<RawHoliday>>>;
}

/// A source that always returns an error.
///
/// Used when the remote source cannot be built (for instance, no API key is
/// configured) so that every fetch degrades to fallback data.
#[derive(Debug)]
pub struct ErrorSource {
    name: String,
    error: ProviderError,
}

impl ErrorSource {
    /// Creates a new error source.
    pub fn new(name: impl Into<String>, error: ProviderError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }
}

impl HolidaySource for ErrorSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_holidays(
        &self,
        _request: HolidayRequest,
    ) -> BoxFuture<'_, ProviderResult<Vec<RawHoliday>>> {
        // ProviderError is not Clone; rebuild it from its parts.
        let error =
            ProviderError::new(self.error.code(), self.error.message()).with_provider(&self.name);
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[test]
    fn request_builder() {
        let headers = AuthHeaders::default().with("x-test", "1");
        let request = HolidayRequest::new("ES", 2025).with_headers(headers);

        assert_eq!(request.country, "ES");
        assert_eq!(request.year, 2025);
        assert_eq!(request.headers.get("x-test"), Some("1"));
    }

    #[tokio::test]
    async fn error_source_returns_error() {
        let source = ErrorSource::new(
            "rapidapi",
            ProviderError::configuration("no API key configured"),
        );

        assert_eq!(source.name(), "rapidapi");

        let err = source
            .fetch_holidays(HolidayRequest::new("ES", 2025))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
        assert_eq!(err.provider(), Some("rapidapi"));
    }
}
