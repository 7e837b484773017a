//! Client error types.

use std::fmt;

use famcal_providers::ProviderError;
use famcal_service::{ServiceError, StoreError};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Calendar service error.
    Service(ServiceError),
    /// Durable store error.
    Store(StoreError),
    /// Holiday source or embedded data error.
    Provider(ProviderError),
    /// IO error.
    Io(std::io::Error),
    /// Invalid command-line input.
    Usage(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Service(err) => write!(f, "{}", err),
            Self::Store(err) => write!(f, "storage error: {}", err),
            Self::Provider(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Usage(msg) => write!(f, "invalid input: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Provider(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ServiceError> for ClientError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<StoreError> for ClientError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<ProviderError> for ClientError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(std::io::Error::other(err))
    }
}
