//! Enrich command implementation
//!
//! This module implements the `enrich` command: read a vendor list, look
//! up new companies in the national registries and update the company
//! dataset.

use crate::adapters::input::read_identities;
use crate::adapters::store::{CompanyStore, CsvCompanyStore};
use crate::cli::{
    EXIT_COMPLETED_WITH_ERRORS, EXIT_CONFIG, EXIT_FATAL, EXIT_INPUT, EXIT_OK, EXIT_PERSISTENCE,
};
use crate::config::load_config;
use crate::core::enrich::{EnrichmentCoordinator, PersistenceStatus, RunReport};
use crate::core::progress::{ProgressSink, ProgressUpdate};
use crate::domain::{CountryCode, VendorIdentity};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::watch;

/// Exit code used when a shutdown signal stopped the run
pub const EXIT_INTERRUPTED: i32 = 130;

/// Arguments for the enrich command
#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Vendor list (CSV with a country and a company id column)
    #[arg(short, long)]
    pub input: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Run the whole pipeline without writing the company dataset
    #[arg(long)]
    pub dry_run: bool,

    /// Re-fetch companies already present in the dataset
    #[arg(long)]
    pub refresh_existing: bool,

    /// Only process these countries (comma-separated, e.g. FR,BE)
    #[arg(long)]
    pub country: Option<String>,
}

impl EnrichArgs {
    /// Execute the enrich command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, "Starting enrich command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if self.refresh_existing {
            tracing::info!("Enabling refresh of existing companies from CLI");
            config.enrichment.refresh_existing = true;
        }

        let countries = match self.country.as_deref().map(parse_countries).transpose() {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Invalid --country value: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let vendor_list = match read_identities(
            &self.input,
            &config.input.country_column,
            &config.input.id_column,
        ) {
            Ok(list) => list,
            Err(e) => {
                tracing::error!(error = %e, input = %self.input, "Failed to read vendor list");
                eprintln!("Failed to read vendor list: {e}");
                return Ok(EXIT_INPUT);
            }
        };

        let identities = match &countries {
            Some(countries) => filter_countries(vendor_list.identities, countries),
            None => vendor_list.identities,
        };

        let mut store = match CsvCompanyStore::open(&config.store.path) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, path = %config.store.path, "Failed to load company dataset");
                eprintln!("Failed to load company dataset: {e}");
                return Ok(EXIT_PERSISTENCE);
            }
        };

        let load_report = store.load_report();
        if !load_report.is_clean() {
            println!(
                "⚠️  Company dataset has {} integrity issue(s); see `vendor-enrich status`",
                load_report.issue_count()
            );
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - the company dataset will not be written");
            println!("🔍 DRY RUN MODE - The company dataset will not be written");
            println!();
        }

        if !self.yes && !config.application.dry_run {
            println!("Enrichment Configuration:");
            println!("  Input: {} ({} vendors)", self.input, identities.len());
            if vendor_list.skipped_rows > 0 {
                println!("  Incomplete rows skipped: {}", vendor_list.skipped_rows);
            }
            println!(
                "  Countries: {}",
                match &countries {
                    Some(c) => c.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", "),
                    None => "All supported".to_string(),
                }
            );
            println!("  Dataset: {} ({} companies)", config.store.path, store.len());
            println!("  Refresh existing: {}", config.enrichment.refresh_existing);
            println!("  Batch size: {}", config.enrichment.batch_size);
            println!("  Concurrency: {}", config.enrichment.concurrency);
            println!();
            print!("Proceed with enrichment? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut answer = String::new();
            io::stdin().read_line(&mut answer)?;

            if !answer.trim().eq_ignore_ascii_case("y") {
                println!("Enrichment cancelled.");
                return Ok(EXIT_OK);
            }
        }

        let progress = Arc::new(BarProgress::new());
        let coordinator = match EnrichmentCoordinator::from_config(&config) {
            Ok(c) => c
                .with_progress(progress.clone())
                .with_shutdown(shutdown_signal),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create enrichment coordinator");
                eprintln!("Failed to initialize enrichment: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        println!("🚀 Starting enrichment...");
        println!();

        let report = coordinator.run(&identities, &mut store).await;
        progress.finish();

        let report = match report {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(error = %e, "Enrichment aborted");
                eprintln!("Enrichment aborted: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        print_report(&report);

        let exit_code = exit_code_for(&report);
        match exit_code {
            EXIT_OK => println!("✅ Enrichment completed successfully!"),
            EXIT_INTERRUPTED => {
                println!("⚠️  Enrichment interrupted. Fetched results were merged.");
                println!("   Run the same command to continue with the remaining vendors.");
            }
            EXIT_PERSISTENCE => println!("❌ Enrichment completed but the dataset was not saved"),
            _ => println!("⚠️  Enrichment completed with errors"),
        }

        Ok(exit_code)
    }
}

/// Parse a comma-separated list of country codes
pub fn parse_countries(value: &str) -> Result<Vec<CountryCode>, String> {
    let mut countries = Vec::new();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let country: CountryCode = part.parse()?;
        if !countries.contains(&country) {
            countries.push(country);
        }
    }
    if countries.is_empty() {
        return Err("no country given".to_string());
    }
    Ok(countries)
}

/// Keep identities whose country is in `countries`
pub fn filter_countries(
    identities: Vec<VendorIdentity>,
    countries: &[CountryCode],
) -> Vec<VendorIdentity> {
    identities
        .into_iter()
        .filter(|identity| {
            identity
                .country
                .parse::<CountryCode>()
                .is_ok_and(|c| countries.contains(&c))
        })
        .collect()
}

/// Map a finished run to the process exit code
pub fn exit_code_for(report: &RunReport) -> i32 {
    if report.persistence_failed() {
        EXIT_PERSISTENCE
    } else if report.interrupted {
        EXIT_INTERRUPTED
    } else if report.is_successful() {
        EXIT_OK
    } else {
        EXIT_COMPLETED_WITH_ERRORS
    }
}

fn print_report(report: &RunReport) {
    println!();
    println!("📊 Enrichment Summary:");
    println!("  Candidates: {}", report.total_candidates);
    println!("  Already known: {}", report.known);
    println!("  Processed: {}", report.processed);
    println!("  Added: {}", report.added);
    println!("  Updated: {}", report.updated);
    println!("  Skipped (unsupported country): {}", report.skipped_unsupported);
    println!("  Skipped (invalid id): {}", report.skipped_invalid);
    println!("  Duplicates dropped: {}", report.duplicates_dropped);
    println!("  Errors: {}", report.errors);
    println!("  Duration: {:.2}s", report.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", report.success_rate());
    println!();

    if !report.per_country.is_empty() {
        println!(
            "{:<8} {:<12} {:<10} {:<8} {:<8} {:<8} {:<10}",
            "Country", "Candidates", "Processed", "Errors", "Added", "Updated", "Breaker"
        );
        println!("{}", "-".repeat(70));
        for (country, r) in &report.per_country {
            println!(
                "{:<8} {:<12} {:<10} {:<8} {:<8} {:<8} {:<10}",
                country.as_str(),
                r.candidates,
                r.processed,
                r.fetch_errors + r.merge.errors,
                r.merge.added,
                r.merge.updated,
                if r.breaker_tripped { "tripped" } else { "-" }
            );
        }
        println!();
    }

    match &report.persistence {
        PersistenceStatus::Persisted => println!("💾 Company dataset saved"),
        PersistenceStatus::Skipped => println!("💾 Company dataset not written (dry run)"),
        PersistenceStatus::Failed(reason) => println!("❌ Failed to save company dataset: {reason}"),
    }
    println!();
}

/// Progress sink drawing an `indicatif` bar per country
struct BarProgress {
    bar: ProgressBar,
}

const BAR_SCALE: u64 = 1000;

impl BarProgress {
    fn new() -> Self {
        let bar = ProgressBar::new(BAR_SCALE);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:40.cyan/blue}] {percent:>3}% {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for BarProgress {
    fn on_progress(&self, update: &ProgressUpdate) {
        let position = (update.fraction.clamp(0.0, 1.0) * BAR_SCALE as f64).round() as u64;
        self.bar.set_position(position);
        self.bar.set_message(format!(
            "{} (errors: {}, success: {:.1}%)",
            update.message, update.metrics.errors, update.metrics.success_rate
        ));
    }

    fn on_country_complete(&self, country: CountryCode, breaker_tripped: bool) {
        if breaker_tripped {
            self.bar.println(format!(
                "⚠️  {country}: too many consecutive failures, remaining ids skipped"
            ));
        } else {
            self.bar.println(format!("✅ {country} done"));
        }
        self.bar.reset();
    }
}
