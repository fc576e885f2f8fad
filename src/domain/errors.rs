//! Domain error types
//!
//! This module defines the error hierarchy for the enrichment pipeline.
//! Third-party error types (reqwest, csv, toml) are converted into domain
//! variants at the boundary and never leak through the public API.

use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the crate. Most failures in
/// the pipeline are contained and counted rather than returned; the variants
/// that do surface are configuration, input and store problems, plus the
/// fatal [`EnrichError::InvariantViolation`].
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation errors (malformed id, unsupported country)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Registry source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Company store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Internal contract violated; aborts the run
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),

    /// Input file errors
    #[error("Input error: {0}")]
    Input(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while querying a country registry
///
/// These never escape a country adapter's `fetch`; they are logged and
/// turned into a sentinel result.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network or connection failure
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Request exceeded the per-fetch timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Registry has no entry for the id
    #[error("No registry entry for {0}")]
    NotFound(String),
}

impl SourceError {
    /// Map a reqwest error onto the source taxonomy
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout(err.to_string())
        } else if err.is_decode() {
            SourceError::InvalidResponse(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

/// Company store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record was rejected at upsert time
    #[error("Malformed record for id '{id}': {reason}")]
    MalformedRecord { id: String, reason: String },

    /// The dataset file could not be loaded
    #[error("Failed to load company dataset: {0}")]
    LoadFailed(String),

    /// The dataset could not be durably written
    #[error("Failed to persist company dataset: {0}")]
    PersistFailed(String),
}

impl From<std::io::Error> for EnrichError {
    fn from(err: std::io::Error) -> Self {
        EnrichError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EnrichError {
    fn from(err: serde_json::Error) -> Self {
        EnrichError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for EnrichError {
    fn from(err: toml::de::Error) -> Self {
        EnrichError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<csv::Error> for EnrichError {
    fn from(err: csv::Error) -> Self {
        EnrichError::Input(format!("CSV error: {err}"))
    }
}
