//! Service error types.

use std::io;

use famcal_core::ValidationError;
use thiserror::Error;

/// Result type for key-value store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for calendar service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from a [`KeyValueStore`](crate::KeyValueStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error reading or writing the backing file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The backing file or a value is not valid JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the value would exceed the store's byte quota.
    #[error("Storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },
}

/// Errors from the calendar service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Durable store failure.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The event was rejected before any I/O.
    #[error("Invalid event: {0}")]
    Validation(#[from] ValidationError),

    /// No user event has this id.
    #[error("Event not found: {id}")]
    NotFound { id: String },

    /// Holiday-derived events are rebuilt from holiday data and cannot be edited.
    #[error("Holiday events cannot be modified: {id}")]
    HolidayEventImmutable { id: String },
}

impl ServiceError {
    /// Creates a not found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a holiday-event-immutable error.
    pub fn holiday_event_immutable(id: impl Into<String>) -> Self {
        Self::HolidayEventImmutable { id: id.into() }
    }
}
