//! Tracing setup for famcal
//!
//! Provides unified logging configuration for all crates.
//!
//! # Usage
//!
//! ```ignore
//! use famcal_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::default()).expect("failed to initialize tracing");
//! ```
//!
//! An extra layer (for example the persisted log journal) can be installed
//! alongside the formatter with [`init_tracing_with_layer`].

use thiserror::Error;
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    prelude::*,
    registry::LookupSpan,
};

/// A type-erased layer installed directly on the registry.
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Output format for tracing logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format (default)
    #[default]
    Compact,
    /// JSON format
    Json,
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// The default log level when RUST_LOG is not set
    pub default_level: Level,
    /// Output format for log messages
    pub output_format: TracingOutputFormat,
    /// Whether to include file/line information in logs
    pub include_location: bool,
    /// Whether to include target (module path) in logs
    pub include_target: bool,
    /// Whether to include timestamps
    pub include_timestamp: bool,
    /// Whether to include span events (enter/exit)
    pub include_span_events: bool,
    /// Custom env filter directive (overrides default_level if set)
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_target: false,
            include_timestamp: false,
            include_span_events: false,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Create a config suitable for CLI usage with debug mode
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            output_format: TracingOutputFormat::Compact,
            include_location: true,
            include_target: true,
            include_timestamp: false,
            include_span_events: false,
            env_filter: None,
        }
    }

    /// Create a config emitting structured JSON lines
    #[must_use]
    pub fn json() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Json,
            include_location: true,
            include_target: true,
            include_timestamp: true,
            include_span_events: true,
            env_filter: None,
        }
    }

    /// Set the default log level
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// Set the output format
    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set a custom env filter directive
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    fn build_env_filter(&self) -> Result<EnvFilter, TracingError> {
        if let Some(ref filter) = self.env_filter {
            return Ok(EnvFilter::try_new(filter)?);
        }
        Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(self.default_level))))
    }
}

/// Targets of the workspace crates; dependencies stay silent by default.
const TARGETS: [&str; 5] = [
    "famcal",
    "famcal_core",
    "famcal_providers",
    "famcal_service",
    "famcal_client",
];

fn default_directive(level: Level) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing with the given configuration.
///
/// The `RUST_LOG` environment variable overrides the default level.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set or if
/// the env filter directive is invalid.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    init_tracing_with_layer(config, None)
}

/// Initialize tracing with an additional layer alongside the formatter.
///
/// The env filter applies to the formatter only; the extra layer sees every
/// event and does its own filtering.
pub fn init_tracing_with_layer(
    config: TracingConfig,
    extra: Option<BoxedLayer>,
) -> Result<(), TracingError> {
    let env_filter = config.build_env_filter()?;
    let subscriber = tracing_subscriber::registry()
        .with(extra)
        .with(formatter(&config).with_filter(env_filter));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// The stderr formatter for `config`, boxed so every format has one type.
fn formatter<S>(config: &TracingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    let span_events = if config.include_span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target)
        .with_span_events(span_events);

    match (config.output_format, config.include_timestamp) {
        (TracingOutputFormat::Pretty, true) => base.pretty().boxed(),
        (TracingOutputFormat::Pretty, false) => base.pretty().without_time().boxed(),
        (TracingOutputFormat::Compact, true) => base.compact().boxed(),
        (TracingOutputFormat::Compact, false) => base.compact().without_time().boxed(),
        (TracingOutputFormat::Json, true) => base.json().boxed(),
        (TracingOutputFormat::Json, false) => base.json().without_time().boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_by_default() {
        let config = TracingConfig::default();
        assert_eq!(config.default_level, Level::WARN);
        assert_eq!(config.output_format, TracingOutputFormat::Compact);
        assert!(!config.include_location);
        assert!(config.env_filter.is_none());
    }

    #[test]
    fn explicit_filter_wins_and_bad_filter_errors() {
        let config = TracingConfig::default().with_env_filter("famcal_service=trace");
        assert!(config.build_env_filter().is_ok());

        let config = TracingConfig::default().with_env_filter("famcal_service=loud");
        assert!(matches!(config.build_env_filter(), Err(TracingError::EnvFilter(_))));
    }

    #[test]
    fn test_default_directive_covers_workspace_crates() {
        let directive = default_directive(Level::INFO);
        assert!(directive.starts_with("famcal=INFO,"));
        assert!(directive.contains("famcal_service=INFO"));
        assert!(EnvFilter::try_new(&directive).is_ok());
    }

    #[test]
    fn test_cli_debug_config() {
        let config = TracingConfig::cli_debug();
        assert_eq!(config.default_level, Level::DEBUG);
        assert_eq!(config.output_format, TracingOutputFormat::Compact);
        assert!(config.include_location);
    }

    #[test]
    fn test_json_config() {
        let config = TracingConfig::json();
        assert_eq!(config.output_format, TracingOutputFormat::Json);
        assert!(config.include_span_events);
    }

    #[test]
    fn test_builder_methods() {
        let config = TracingConfig::default()
            .with_level(Level::INFO)
            .with_format(TracingOutputFormat::Pretty)
            .with_env_filter("famcal_service=trace");

        assert_eq!(config.default_level, Level::INFO);
        assert_eq!(config.output_format, TracingOutputFormat::Pretty);
        assert_eq!(config.env_filter, Some("famcal_service=trace".to_string()));
    }
}
