//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vendor-enrich.toml")]
    pub output: String,

    /// Include comments explaining every option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing vendor-enrich configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Point [store] path at your company dataset");
                println!("  3. Validate configuration: vendor-enrich validate-config");
                println!("  4. Run enrichment: vendor-enrich enrich --input vendors.csv");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    pub fn generate_minimal_config() -> String {
        r#"# vendor-enrich configuration

[application]
log_level = "info"
dry_run = false

[enrichment]
batch_size = 100
concurrency = 3
inter_batch_delay_ms = 1000
per_fetch_timeout_secs = 30
max_consecutive_failures = 5
refresh_existing = false
strict_id_validation = false

[sources]
fr_api_url = "https://recherche-entreprises.api.gouv.fr/search?q={id}"
be_search_url = "https://kbopub.economie.fgov.be/kbopub/zoeknummerform.html?nummer={id}&actionLu=Search"
dk_company_url = "https://datacvr.virk.dk/enhed/virksomhed/{id}?fritekst={id}&sideIndex=0&size=10"

[store]
path = "data/companies.csv"

[input]
country_column = "country"
id_column = "company_id"

[logging]
local_enabled = true
local_path = "/var/log/vendor-enrich"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with comments
    pub fn generate_config_with_examples() -> String {
        r#"# vendor-enrich configuration
#
# Every value below is the default. Any string may reference environment
# variables as ${NAME}; any key may be overridden with
# VENDOR_ENRICH_<SECTION>_<KEY>, e.g. VENDOR_ENRICH_ENRICHMENT_CONCURRENCY=5.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Run the pipeline without writing the company dataset
dry_run = false

# ============================================================================
# Enrichment
# ============================================================================
[enrichment]
# Ids fetched per batch (1-1000)
batch_size = 100

# Lookups in flight at once within a batch (1-50)
concurrency = 3

# Pause between batches of the same country, in milliseconds
inter_batch_delay_ms = 1000

# Upper bound for a single lookup, in seconds (1-300)
per_fetch_timeout_secs = 30

# Stop a country after this many lookups in a row return no data
max_consecutive_failures = 5

# Also re-fetch companies already present in the dataset
refresh_existing = false

# Require ids of 6 to 15 digits
strict_id_validation = false

# ============================================================================
# Registry Sources
# ============================================================================
# {id} is replaced with the URL-encoded company id.
[sources]
# France: JSON search index
fr_api_url = "https://recherche-entreprises.api.gouv.fr/search?q={id}"

# Belgium: KBO public search page
be_search_url = "https://kbopub.economie.fgov.be/kbopub/zoeknummerform.html?nummer={id}&actionLu=Search"

# Denmark: CVR company page
dk_company_url = "https://datacvr.virk.dk/enhed/virksomhed/{id}?fritekst={id}&sideIndex=0&size=10"

# User agent sent with every request
# user_agent = "vendor-enrich/0.3.0"

# ============================================================================
# Company Dataset
# ============================================================================
[store]
# CSV file, created on first save
path = "data/companies.csv"

# ============================================================================
# Vendor List
# ============================================================================
[input]
# Header names, matched case-insensitively
country_column = "country"
id_column = "company_id"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = true

# Directory for log files
local_path = "/var/log/vendor-enrich"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    #[test]
    fn test_generated_configs_load() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = load_config_from_str(&content).unwrap();
            assert_eq!(config.enrichment.concurrency, 3);
            assert_eq!(config.store.path, "data/companies.csv");
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let args = InitArgs {
            output: file.path().to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("vendor-enrich.toml");
        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: true,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert!(fs::read_to_string(output).unwrap().contains("[enrichment]"));
    }
}
