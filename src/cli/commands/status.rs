//! Status command implementation
//!
//! This module implements the `status` command for displaying company
//! dataset statistics and integrity issues.

use crate::adapters::store::{search, CompanyStore, CsvCompanyStore, IntegrityReport, StoreStats};
use crate::cli::{EXIT_COMPLETED_WITH_ERRORS, EXIT_CONFIG, EXIT_OK, EXIT_PERSISTENCE};
use crate::config::load_config;
use clap::Args;

/// Maximum rows printed for a search or an issue list
const MAX_ROWS: usize = 20;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show companies whose id or name contains this text
    #[arg(long)]
    pub search: Option<String>,

    /// Exit with code 1 when the dataset has integrity issues
    #[arg(long)]
    pub strict: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking company dataset status");

        println!("📊 Company Dataset Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let store = match CsvCompanyStore::open(&config.store.path) {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to load company dataset");
                println!("   Error: {e}");
                return Ok(EXIT_PERSISTENCE);
            }
        };

        if store.is_empty() && store.retained_count() == 0 {
            println!("No companies found in {}.", config.store.path);
            println!("Run 'vendor-enrich enrich --input <vendors.csv>' to populate it.");
            return Ok(EXIT_OK);
        }

        let stats = StoreStats::from_records(store.records());
        println!("Dataset: {}", config.store.path);
        println!("  Companies: {}", stats.total);
        println!("  Unknown names: {}", stats.unknown_names);
        if store.retained_count() > 0 {
            println!("  Rows kept aside (unsupported country): {}", store.retained_count());
        }
        println!();
        println!("{:<10} {:<10}", "Country", "Companies");
        println!("{}", "-".repeat(20));
        for (country, count) in &stats.per_country {
            println!("{:<10} {:<10}", country.as_str(), count);
        }
        println!();
        println!("Classification fill rate:");
        println!("  L1: {:.1}%", stats.l1_fill_pct);
        println!("  L2: {:.1}%", stats.l2_fill_pct);
        println!("  L3: {:.1}%", stats.l3_fill_pct);
        println!();

        let integrity = store.load_report();
        print_integrity(integrity);

        if let Some(query) = &self.search {
            let matches = search(store.records(), query);
            println!("🔎 {} match(es) for \"{query}\":", matches.len());
            for record in matches.iter().take(MAX_ROWS) {
                println!(
                    "  {} {:<15} {} [{}]",
                    record.country.as_str(),
                    record.id.as_str(),
                    record.name,
                    record.activity_code
                );
            }
            if matches.len() > MAX_ROWS {
                println!("  ... and {} more", matches.len() - MAX_ROWS);
            }
            println!();
        }

        if self.strict && !integrity.is_clean() {
            return Ok(EXIT_COMPLETED_WITH_ERRORS);
        }
        Ok(EXIT_OK)
    }
}

fn print_integrity(report: &IntegrityReport) {
    if report.is_clean() {
        println!("✅ No integrity issues");
        println!();
        return;
    }

    println!("⚠️  {} integrity issue(s):", report.issue_count());
    for id in report.duplicate_ids.iter().take(MAX_ROWS) {
        println!("  - duplicate id {id}");
    }
    for (id, country) in report.invalid_countries.iter().take(MAX_ROWS) {
        println!("  - {id}: unsupported country \"{country}\"");
    }
    for (id, column) in report.missing_fields.iter().take(MAX_ROWS) {
        println!("  - {id}: empty {column}");
    }
    println!();
}
