//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the vendor-enrich configuration file.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates after parsing and env overrides
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Batch Size: {}", config.enrichment.batch_size);
        println!("  Concurrency: {}", config.enrichment.concurrency);
        println!(
            "  Inter-batch Delay: {}ms",
            config.enrichment.inter_batch_delay_ms
        );
        println!(
            "  Per-fetch Timeout: {}s",
            config.enrichment.per_fetch_timeout_secs
        );
        println!(
            "  Max Consecutive Failures: {}",
            config.enrichment.max_consecutive_failures
        );
        println!("  Refresh Existing: {}", config.enrichment.refresh_existing);
        println!("  FR Source: {}", config.sources.fr_api_url);
        println!("  BE Source: {}", config.sources.be_search_url);
        println!("  DK Source: {}", config.sources.dk_company_url);
        println!("  Company Dataset: {}", config.store.path);
        println!(
            "  Input Columns: {} / {}",
            config.input.country_column, config.input.id_column
        );
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_validate_accepts_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[application]\nlog_level = \"debug\"").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        assert_eq!(ValidateArgs {}.execute(&path).await.unwrap(), EXIT_OK);
    }

    #[tokio::test]
    async fn test_validate_rejects_bad_concurrency() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[enrichment]\nconcurrency = 0").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        assert_eq!(ValidateArgs {}.execute(&path).await.unwrap(), EXIT_CONFIG);
    }
}
