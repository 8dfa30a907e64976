//! Error types for AUDIENCE operations

use thiserror::Error;

/// Criterion resolution errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CriterionError {
    #[error("Criterion '{name}' is not recognized")]
    Unrecognized { name: String },

    #[error("Criterion name '{name}' is already registered by {existing}")]
    DuplicateName { name: String, existing: String },
}

/// Record-source errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("Record source has not been set")]
    NotConfigured,

    #[error("Record fetch failed: {reason}")]
    FetchFailed { reason: String },

    #[error("Record source lock poisoned")]
    LockPoisoned,
}

/// Cache layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache backend error: {reason}")]
    Backend { reason: String },

    #[error("Cache key encoding failed: {reason}")]
    KeyEncoding { reason: String },

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all AUDIENCE errors.
///
/// The variants keep the failure domains distinct so callers can tell
/// misconfigured record data (an unrecognized criterion) from
/// misconfigured wiring (an unbound source, a bad config value).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetingError {
    #[error("Criterion error: {0}")]
    Criterion(#[from] CriterionError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for AUDIENCE operations.
pub type TargetingResult<T> = Result<T, TargetingError>;

// =============================================================================
// TESTS
// =============================================================================
