//! API credential management.
//!
//! The holidays API authenticates with a static key sent in a header. A
//! [`TokenProvider`] owns that key, reports whether it is usable, and can
//! refresh it by re-resolving it from its configured origin (environment
//! variable, password store, ...).

use std::fmt;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};
use crate::source::BoxFuture;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-rapidapi-key";
/// Header carrying the API host.
pub const API_HOST_HEADER: &str = "x-rapidapi-host";

/// An API key. The value is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw key, for placing in a request header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the key is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Ordered set of credential headers for one request.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AuthHeaders(Vec<(String, String)>);

impl AuthHeaders {
    /// Builder method to append a header.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first header with the given name
    /// (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns true if no headers are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuthHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (name, value) in &self.0 {
            if name.eq_ignore_ascii_case(API_KEY_HEADER) {
                list.entry(&(name, "<redacted>"));
            } else {
                list.entry(&(name, value));
            }
        }
        list.finish()
    }
}

/// Supplies the credential used for holiday requests.
pub trait TokenProvider: Send + Sync {
    /// Returns true if a non-empty credential is currently held.
    fn is_valid(&self) -> bool;

    /// Obtains a fresh credential.
    ///
    /// The caller is responsible for passing the result to [`store`](Self::store).
    ///
    /// # Errors
    ///
    /// Returns an authentication error if no credential can be obtained.
    fn refresh(&self) -> BoxFuture<'_, ProviderResult<ApiKey>>;

    /// Replaces the held credential.
    fn store(&self, key: ApiKey);

    /// Builds the headers for a request with the held credential.
    fn auth_headers(&self) -> AuthHeaders;
}

/// Re-resolves the API key from its origin.
pub type KeyResolver = Box<dyn Fn() -> Result<String, String> + Send + Sync>;

/// [`TokenProvider`] for a static RapidAPI key.
pub struct ApiKeyProvider {
    host: String,
    key: RwLock<Option<ApiKey>>,
    resolver: Option<KeyResolver>,
}

impl ApiKeyProvider {
    /// Creates a provider for the given API host, holding `key` if any.
    pub fn new(host: impl Into<String>, key: Option<ApiKey>) -> Self {
        Self {
            host: host.into(),
            key: RwLock::new(key),
            resolver: None,
        }
    }

    /// Builder method to set how the key is re-resolved on refresh.
    pub fn with_resolver(mut self, resolver: KeyResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Returns the API host sent with every request.
    pub fn host(&self) -> &str {
        &self.host
    }

    fn current(&self) -> Option<ApiKey> {
        self.key
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for ApiKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyProvider")
            .field("host", &self.host)
            .field("has_key", &self.is_valid())
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}

impl TokenProvider for ApiKeyProvider {
    fn is_valid(&self) -> bool {
        self.current().is_some_and(|key| !key.is_blank())
    }

    fn refresh(&self) -> BoxFuture<'_, ProviderResult<ApiKey>> {
        Box::pin(async move {
            let Some(resolver) = self.resolver.as_ref() else {
                // A static key cannot be renewed; hand back what we hold.
                return self
                    .current()
                    .filter(|key| !key.is_blank())
                    .ok_or_else(|| ProviderError::authentication("no API key configured"));
            };

            let value = resolver()
                .map_err(|e| ProviderError::authentication(format!("failed to resolve API key: {e}")))?;
            let key = ApiKey::new(value.trim());
            if key.is_blank() {
                return Err(ProviderError::authentication("resolved API key is empty"));
            }

            debug!("API key re-resolved");
            Ok(key)
        })
    }

    fn store(&self, key: ApiKey) {
        *self.key.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
        info!("API key updated");
    }

    fn auth_headers(&self) -> AuthHeaders {
        let key = self.current().map(|k| k.0).unwrap_or_default();
        AuthHeaders::default()
            .with(API_KEY_HEADER, key)
            .with(API_HOST_HEADER, &self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    const HOST: &str = "public-holidays7.p.rapidapi.com";

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("super-secret");
        assert_eq!(format!("{key:?}"), "ApiKey(<redacted>)");
        assert_eq!(key.expose(), "super-secret");
    }

    #[test]
    fn auth_headers_contain_key_and_host() {
        let provider = ApiKeyProvider::new(HOST, Some(ApiKey::new("k1")));
        let headers = provider.auth_headers();

        assert_eq!(headers.get("x-rapidapi-key"), Some("k1"));
        assert_eq!(headers.get("X-RapidAPI-Host"), Some(HOST));
        assert!(!format!("{headers:?}").contains("k1"));
    }

    #[test]
    fn validity() {
        assert!(ApiKeyProvider::new(HOST, Some(ApiKey::new("k1"))).is_valid());
        assert!(!ApiKeyProvider::new(HOST, Some(ApiKey::new("  "))).is_valid());
        assert!(!ApiKeyProvider::new(HOST, None).is_valid());
    }

    #[tokio::test]
    async fn refresh_without_resolver_returns_held_key() {
        let provider = ApiKeyProvider::new(HOST, Some(ApiKey::new("k1")));
        assert_eq!(provider.refresh().await.unwrap().expose(), "k1");

        let empty = ApiKeyProvider::new(HOST, None);
        let err = empty.refresh().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
    }

    #[tokio::test]
    async fn refresh_uses_resolver_then_store_applies() {
        let provider = ApiKeyProvider::new(HOST, None)
            .with_resolver(Box::new(|| Ok(" fresh-key \n".to_string())));
        assert!(!provider.is_valid());

        let key = provider.refresh().await.unwrap();
        assert_eq!(key.expose(), "fresh-key");
        assert!(!provider.is_valid());

        provider.store(key);
        assert!(provider.is_valid());
        assert_eq!(provider.auth_headers().get(API_KEY_HEADER), Some("fresh-key"));
    }

    #[tokio::test]
    async fn refresh_failure_is_authentication_error() {
        let provider = ApiKeyProvider::new(HOST, Some(ApiKey::new("old")))
            .with_resolver(Box::new(|| Err("env var not set".to_string())));

        let err = provider.refresh().await.unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
        assert!(err.message().contains("env var not set"));

        let blank = ApiKeyProvider::new(HOST, None).with_resolver(Box::new(|| Ok(String::new())));
        assert!(blank.refresh().await.is_err());
    }
}
