//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/famcal/config.toml` by default.
//!
//! The API key supports secret references (see [`crate::secret`]), so the
//! file itself never has to hold the key:
//!
//! ```toml
//! country = "ES"
//!
//! [api]
//! key = "env::RAPIDAPI_KEY"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use famcal_providers::{ApiKey, KeyResolver};
use serde::{Deserialize, Serialize};

use crate::secret::{self, SecretRef};

/// Configuration for the famcal client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Country whose holidays are shown.
    pub country: String,

    /// Holidays API settings.
    pub api: ApiSettings,

    /// Durable store settings.
    pub storage: StorageSettings,

    /// Log journal settings.
    pub logging: LoggingSettings,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            country: "ES".to_string(),
            api: ApiSettings::default(),
            storage: StorageSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Holidays API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the holidays API.
    pub base_url: String,

    /// Value of the `x-rapidapi-host` header.
    pub host: String,

    /// API key (supports `pass::` and `env::` prefixes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://public-holidays7.p.rapidapi.com/".to_string(),
            host: "public-holidays7.p.rapidapi.com".to_string(),
            key: None,
            timeout_secs: 10,
        }
    }
}

impl ApiSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves the configured key.
    ///
    /// Returns `Ok(None)` when no key is configured or it resolves to an
    /// empty value.
    pub fn resolve_key(&self) -> Result<Option<ApiKey>, String> {
        let Some(value) = self.key.as_deref() else {
            return Ok(None);
        };
        let key = ApiKey::new(secret::resolve(value)?.trim());
        Ok((!key.is_blank()).then_some(key))
    }

    /// Returns a closure that re-resolves the configured key on demand.
    pub fn key_resolver(&self) -> Option<KeyResolver> {
        let reference = SecretRef::parse(self.key.as_deref()?);
        Some(Box::new(move || reference.resolve()))
    }

    /// Describes where the key comes from without revealing it.
    pub fn key_source(&self) -> String {
        match self.key.as_deref() {
            Some(value) => SecretRef::parse(value).to_string(),
            None => "<not configured>".to_string(),
        }
    }

    /// Converts to the RapidAPI client configuration.
    #[cfg(feature = "rapidapi")]
    pub fn to_rapidapi_config(&self) -> Result<famcal_providers::rapidapi::RapidApiConfig, String> {
        use famcal_providers::rapidapi::RapidApiConfig;

        RapidApiConfig::new(&self.base_url, &self.host)
            .map(|config| config.with_timeout(self.timeout()))
            .map_err(|e| format!("invalid api.base_url {:?}: {}", self.base_url, e))
    }
}

/// Durable store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Path to the store file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Log journal settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Keep recent log events in the store.
    pub journal: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { journal: true }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Checks the settings that can be checked without network access.
    pub fn validate(&self) -> Result<(), String> {
        let country = self.country.trim();
        if country.is_empty() {
            return Err("country must not be empty".to_string());
        }
        if !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("country {:?} is not a country code", self.country));
        }
        if self.api.timeout_secs == 0 {
            return Err("api.timeout_secs must be greater than zero".to_string());
        }
        #[cfg(feature = "rapidapi")]
        self.api.to_rapidapi_config()?;
        self.api.resolve_key()?;
        Ok(())
    }

    /// Returns the store file path.
    pub fn store_path(&self) -> PathBuf {
        self.storage
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("store.json"))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("famcal")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("famcal")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = ClientConfig::parse("").unwrap();
        assert_eq!(config.country, "ES");
        assert_eq!(config.api.host, "public-holidays7.p.rapidapi.com");
        assert_eq!(config.api.timeout_secs, 10);
        assert!(config.api.key.is_none());
        assert!(config.storage.path.is_none());
        assert!(config.logging.journal);
    }

    #[test]
    fn parse_full_file() {
        let config = ClientConfig::parse(
            r#"
country = "fr"

[api]
base_url = "http://localhost:8080/"
key = "env::RAPIDAPI_KEY"
timeout_secs = 3

[storage]
path = "/tmp/famcal/store.json"

[logging]
journal = false
"#,
        )
        .unwrap();

        assert_eq!(config.country, "fr");
        assert_eq!(config.api.base_url, "http://localhost:8080/");
        assert_eq!(config.api.host, "public-holidays7.p.rapidapi.com");
        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(config.api.key_source(), "env::RAPIDAPI_KEY");
        assert_eq!(config.store_path(), PathBuf::from("/tmp/famcal/store.json"));
        assert!(!config.logging.journal);
    }

    #[test]
    fn parse_error_is_reported() {
        let err = ClientConfig::parse("country = [").unwrap_err();
        assert!(err.starts_with("failed to parse config"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "country = \"DE\"\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.country, "DE");

        let missing = ClientConfig::load_from(&dir.path().join("missing.toml"));
        assert!(missing.unwrap_err().contains("failed to read config"));
    }

    #[test]
    fn default_store_path_is_in_data_dir() {
        let config = ClientConfig::default();
        assert!(config.store_path().ends_with("famcal/store.json"));
        assert!(ClientConfig::default_path().ends_with("famcal/config.toml"));
    }

    #[test]
    fn key_resolution() {
        unsafe {
            std::env::set_var("_FAMCAL_TEST_API_KEY", "  secret-key \n");
            std::env::set_var("_FAMCAL_TEST_BLANK_KEY", "   ");
        }

        let mut api = ApiSettings::default();
        assert!(api.resolve_key().unwrap().is_none());
        assert!(api.key_resolver().is_none());
        assert_eq!(api.key_source(), "<not configured>");

        api.key = Some("env::_FAMCAL_TEST_API_KEY".to_string());
        assert_eq!(api.resolve_key().unwrap().unwrap().expose(), "secret-key");
        let resolver = api.key_resolver().unwrap();
        assert_eq!(resolver().unwrap(), "  secret-key \n");

        api.key = Some("env::_FAMCAL_TEST_BLANK_KEY".to_string());
        assert!(api.resolve_key().unwrap().is_none());

        api.key = Some("inline-key".to_string());
        assert_eq!(api.key_source(), "<inline value>");

        unsafe {
            std::env::remove_var("_FAMCAL_TEST_API_KEY");
            std::env::remove_var("_FAMCAL_TEST_BLANK_KEY");
        }
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(ClientConfig::default().validate().is_ok());

        let mut config = ClientConfig::default();
        config.country = "  ".to_string();
        assert!(config.validate().unwrap_err().contains("country"));

        let mut config = ClientConfig::default();
        config.country = "E5".to_string();
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().unwrap_err().contains("timeout_secs"));

        let mut config = ClientConfig::default();
        config.api.key = Some("env::_FAMCAL_TEST_UNSET_KEY_98765".to_string());
        assert!(config.validate().unwrap_err().contains("not set"));
    }

    #[cfg(feature = "rapidapi")]
    #[test]
    fn rapidapi_config_from_settings() {
        let mut api = ApiSettings::default();
        api.timeout_secs = 4;
        let config = api.to_rapidapi_config().unwrap();
        assert_eq!(config.timeout, Duration::from_secs(4));
        assert_eq!(config.host, "public-holidays7.p.rapidapi.com");

        api.base_url = "not a url".to_string();
        assert!(api.to_rapidapi_config().unwrap_err().contains("api.base_url"));
    }

    #[test]
    fn dump_round_trips() {
        let mut config = ClientConfig::default();
        config.api.key = Some("env::KEY".to_string());
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = ClientConfig::parse(&text).unwrap();
        assert_eq!(parsed.api.key.as_deref(), Some("env::KEY"));
        assert_eq!(parsed.country, "ES");
    }
}
