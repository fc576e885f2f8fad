//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON log files with daily or hourly rotation
//! - Event macros shared by the pipeline stages
//!
//! # Example
//!
//! ```no_run
//! use vendor_enrich::logging::init_logging;
//! use vendor_enrich::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(country = "FR", "Enrichment started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a country group
///
/// # Example
///
/// ```no_run
/// use vendor_enrich::log_country_start;
/// use vendor_enrich::domain::CountryCode;
///
/// log_country_start!(CountryCode::Fr, 120);
/// ```
#[macro_export]
macro_rules! log_country_start {
    ($country:expr, $total:expr) => {
        tracing::info!(
            country = %$country,
            total = $total,
            "Enriching country group"
        );
    };
}

/// Log a batch dispatch
///
/// # Example
///
/// ```no_run
/// use vendor_enrich::log_batch_processing;
///
/// log_batch_processing!("DK", 2, 5);
/// ```
#[macro_export]
macro_rules! log_batch_processing {
    ($country:expr, $current:expr, $total:expr) => {
        tracing::debug!(
            country = %$country,
            batch = $current,
            batches = $total,
            progress_pct = ($current as f64 / ($total as f64).max(1.0) * 100.0),
            "Dispatching batch"
        );
    };
}

/// Log a lookup that degraded to a sentinel result
///
/// # Example
///
/// ```no_run
/// use vendor_enrich::log_fetch_failure;
///
/// log_fetch_failure!("BE", "0403170701", "timed out");
/// ```
#[macro_export]
macro_rules! log_fetch_failure {
    ($country:expr, $id:expr, $reason:expr) => {
        tracing::warn!(
            country = %$country,
            id = %$id,
            reason = %$reason,
            "Lookup failed, recording unknown"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use vendor_enrich::log_error_with_context;
/// use vendor_enrich::domain::EnrichError;
///
/// let error = EnrichError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
