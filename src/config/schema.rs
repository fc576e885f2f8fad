//! Configuration schema types
//!
//! This module defines the configuration structure for vendor-enrich.

use crate::core::fetch::FetchConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional; omitted sections take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Fetch and merge settings
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Country registry endpoints
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Company dataset location
    #[serde(default)]
    pub store: StoreConfig,

    /// Vendor list column mapping
    #[serde(default)]
    pub input: InputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EnrichConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.enrichment.validate()?;
        self.sources.validate()?;
        self.store.validate()?;
        self.input.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (run the pipeline, skip writing the dataset)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Enrichment pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Ids dispatched per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum simultaneous fetches within a batch
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Pause between batches in milliseconds
    #[serde(default = "default_inter_batch_delay_ms")]
    pub inter_batch_delay_ms: u64,

    /// Timeout for a single registry lookup in seconds
    #[serde(default = "default_per_fetch_timeout_secs")]
    pub per_fetch_timeout_secs: u64,

    /// Consecutive sentinel results that stop a country
    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: usize,

    /// Re-fetch ids already present in the dataset
    #[serde(default)]
    pub refresh_existing: bool,

    /// Require ids to be 6 to 15 digits
    #[serde(default)]
    pub strict_id_validation: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            concurrency: default_concurrency(),
            inter_batch_delay_ms: default_inter_batch_delay_ms(),
            per_fetch_timeout_secs: default_per_fetch_timeout_secs(),
            max_consecutive_failures: default_max_consecutive_failures(),
            refresh_existing: false,
            strict_id_validation: false,
        }
    }
}

impl EnrichmentConfig {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 || self.batch_size > 1000 {
            return Err("enrichment.batch_size must be between 1 and 1000".to_string());
        }

        if self.concurrency == 0 || self.concurrency > 50 {
            return Err("enrichment.concurrency must be between 1 and 50".to_string());
        }

        if self.per_fetch_timeout_secs == 0 || self.per_fetch_timeout_secs > 300 {
            return Err(
                "enrichment.per_fetch_timeout_secs must be between 1 and 300".to_string(),
            );
        }

        if self.max_consecutive_failures == 0 {
            return Err("enrichment.max_consecutive_failures must be > 0".to_string());
        }

        Ok(())
    }

    /// Per-fetch timeout as a [`Duration`]
    pub fn per_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.per_fetch_timeout_secs)
    }
}

impl From<&EnrichmentConfig> for FetchConfig {
    fn from(config: &EnrichmentConfig) -> Self {
        FetchConfig {
            batch_size: config.batch_size,
            concurrency: config.concurrency,
            inter_batch_delay: Duration::from_millis(config.inter_batch_delay_ms),
            per_fetch_timeout: config.per_fetch_timeout(),
            max_consecutive_failures: config.max_consecutive_failures,
        }
    }
}

/// Country registry endpoints
///
/// Each URL is a template; `{id}` is replaced with the company id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// French company search API
    #[serde(default = "default_fr_api_url")]
    pub fr_api_url: String,

    /// Belgian Crossroads Bank for Enterprises search page
    #[serde(default = "default_be_search_url")]
    pub be_search_url: String,

    /// Danish CVR company page
    #[serde(default = "default_dk_company_url")]
    pub dk_company_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            fr_api_url: default_fr_api_url(),
            be_search_url: default_be_search_url(),
            dk_company_url: default_dk_company_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl SourcesConfig {
    fn validate(&self) -> Result<(), String> {
        for (key, value) in [
            ("fr_api_url", &self.fr_api_url),
            ("be_search_url", &self.be_search_url),
            ("dk_company_url", &self.dk_company_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(format!(
                    "sources.{key} must start with http:// or https://"
                ));
            }
            if !value.contains("{id}") {
                return Err(format!("sources.{key} must contain an {{id}} placeholder"));
            }
        }

        if self.user_agent.trim().is_empty() {
            return Err("sources.user_agent cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Company dataset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the CSV company dataset
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

impl StoreConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("store.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Column mapping for the vendor list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Header of the country column (case-insensitive)
    #[serde(default = "default_country_column")]
    pub country_column: String,

    /// Header of the company id column (case-insensitive)
    #[serde(default = "default_id_column")]
    pub id_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            country_column: default_country_column(),
            id_column: default_id_column(),
        }
    }
}

impl InputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.country_column.trim().is_empty() {
            return Err("input.country_column cannot be empty".to_string());
        }
        if self.id_column.trim().is_empty() {
            return Err("input.id_column cannot be empty".to_string());
        }
        if self.country_column.eq_ignore_ascii_case(&self.id_column) {
            return Err("input.country_column and input.id_column must differ".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    100
}

fn default_concurrency() -> usize {
    3
}

fn default_inter_batch_delay_ms() -> u64 {
    1000
}

fn default_per_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_consecutive_failures() -> usize {
    5
}

fn default_fr_api_url() -> String {
    "https://recherche-entreprises.api.gouv.fr/search?q={id}".to_string()
}

fn default_be_search_url() -> String {
    "https://kbopub.economie.fgov.be/kbopub/zoeknummerform.html?nummer={id}&actionLu=Search"
        .to_string()
}

fn default_dk_company_url() -> String {
    "https://datacvr.virk.dk/enhed/virksomhed/{id}?fritekst={id}&sideIndex=0&size=10".to_string()
}

fn default_user_agent() -> String {
    concat!("vendor-enrich/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_store_path() -> String {
    "data/companies.csv".to_string()
}

fn default_country_column() -> String {
    "country".to_string()
}

fn default_id_column() -> String {
    "company_id".to_string()
}

fn default_local_path() -> String {
    "/var/log/vendor-enrich".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
