//! Configuration management for vendor-enrich.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VENDOR_ENRICH_<SECTION>_<KEY>` overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use vendor_enrich::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vendor-enrich.toml")?;
//!
//! println!("Store: {}", config.store.path);
//! println!("Concurrency: {}", config.enrichment.concurrency);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry run
//! - [`EnrichmentConfig`] - Batching, concurrency, timeouts and circuit breaker
//! - [`SourcesConfig`] - Registry endpoints and user agent
//! - [`StoreConfig`] - Company dataset path
//! - [`InputConfig`] - Vendor list column names
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [enrichment]
//! batch_size = 100
//! concurrency = 3
//! inter_batch_delay_ms = 1000
//! per_fetch_timeout_secs = 30
//! max_consecutive_failures = 5
//!
//! [store]
//! path = "${VENDOR_DATA_DIR}/companies.csv"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, EnrichConfig, EnrichmentConfig, InputConfig, LoggingConfig, SourcesConfig,
    StoreConfig,
};
