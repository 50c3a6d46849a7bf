//! Error types for almanac.

use thiserror::Error;

/// Errors that can occur in almanac operations.
#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time '{0}'. Expected HH:MM")]
    InvalidTime(String),

    #[error("An end time needs a start time")]
    InvalidTimeRange,

    #[error("Event text cannot be empty")]
    EmptyText,

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Id prefix '{0}' matches more than one event")]
    AmbiguousId(String),

    #[error("Hijri conversion failed for {0}")]
    HijriConversion(String),

    #[error("Holiday sync failed: {0}")]
    HolidaySync(String),

    #[error("No event form is open")]
    FormClosed,
}

/// Result type alias for almanac operations.
pub type AlmanacResult<T> = Result<T, AlmanacError>;
