//! Enrichment coordinator - main orchestrator for a run
//!
//! Reconcile, fetch per country, merge, persist once.

use super::report::{CountryReport, PersistenceStatus, RunReport};
use crate::adapters::country::AdapterRegistry;
use crate::adapters::store::CompanyStore;
use crate::config::EnrichConfig;
use crate::core::fetch::{FetchConfig, FetchEngine};
use crate::core::merge::merge_results;
use crate::core::metrics::{CountryMetrics, MetricsAggregator};
use crate::core::progress::{LogProgress, ProgressSink};
use crate::core::reconcile::Reconciler;
use crate::domain::{Result, VendorIdentity};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Options that shape a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Engine settings
    pub fetch: FetchConfig,

    /// Re-fetch ids already in the store
    pub refresh_existing: bool,

    /// Require 6 to 15 digit ids
    pub strict_ids: bool,

    /// Skip the final write
    pub dry_run: bool,
}

impl RunOptions {
    /// Options from a loaded configuration
    pub fn from_config(config: &EnrichConfig) -> Self {
        Self {
            fetch: FetchConfig::from(&config.enrichment),
            refresh_existing: config.enrichment.refresh_existing,
            strict_ids: config.enrichment.strict_id_validation,
            dry_run: config.application.dry_run,
        }
    }
}

/// Enrichment coordinator
pub struct EnrichmentCoordinator {
    registry: AdapterRegistry,
    options: RunOptions,
    progress: Arc<dyn ProgressSink>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl EnrichmentCoordinator {
    /// Create a coordinator over `registry`
    pub fn new(registry: AdapterRegistry, options: RunOptions) -> Self {
        Self {
            registry,
            options,
            progress: Arc::new(LogProgress),
            shutdown: None,
        }
    }

    /// Coordinator with the HTTP adapters described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &EnrichConfig) -> Result<Self> {
        let registry =
            AdapterRegistry::from_sources(&config.sources, config.enrichment.per_fetch_timeout())?;
        Ok(Self::new(registry, RunOptions::from_config(config)))
    }

    /// Send progress events to `sink`
    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Stop between batches and countries once `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Execute a run
    ///
    /// This is the main entry point. It:
    /// 1. Reconciles `identities` against the store's keys
    /// 2. For each country group, fetches through the country's adapter
    /// 3. Merges the group's results into the store
    /// 4. Persists the store once, unless this is a dry run
    ///
    /// Partial failures are reported, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::EnrichError::InvariantViolation`] if a
    /// country without an adapter reaches the fetch stage.
    pub async fn run(
        &self,
        identities: &[VendorIdentity],
        store: &mut dyn CompanyStore,
    ) -> Result<RunReport> {
        let start_time = Instant::now();
        let mut report = RunReport::new();
        report.dry_run = self.options.dry_run;

        tracing::info!(
            run_id = %report.run_id,
            identities = identities.len(),
            store_records = store.len(),
            refresh_existing = self.options.refresh_existing,
            dry_run = self.options.dry_run,
            "Starting enrichment run"
        );

        let reconciliation = Reconciler::new()
            .with_strict_ids(self.options.strict_ids)
            .reconcile(identities, &store.keys());

        report.known = reconciliation.known.len();
        report.skipped_unsupported = reconciliation.skipped_unsupported.len();
        report.skipped_invalid = reconciliation.skipped_invalid;
        report.duplicates_dropped = reconciliation.duplicates_dropped;

        for identity in &reconciliation.skipped_unsupported {
            tracing::debug!(country = %identity.country, id = %identity.id, "Skipping unsupported country");
        }

        let groups = reconciliation.by_country(self.options.refresh_existing);
        let mut engine = FetchEngine::new(&self.options.fetch, self.progress.as_ref());
        if let Some(rx) = &self.shutdown {
            engine = engine.with_shutdown(rx.clone());
        }
        let mut aggregator = MetricsAggregator::new();

        for (country, ids) in &groups {
            if self.shutdown_requested() {
                tracing::warn!(country = %country, "Shutdown requested, skipping remaining countries");
                report.interrupted = true;
                break;
            }

            crate::log_country_start!(country, ids.len());
            let mut metrics = CountryMetrics::new(*country, ids.len());

            let outcome = engine
                .run(&self.registry, *country, ids, &mut metrics)
                .await?;

            let merge = merge_results(store, &outcome.results);

            report.add_country(
                *country,
                CountryReport::new(&metrics, merge, outcome.breaker_tripped),
            );
            aggregator.absorb(metrics);

            if outcome.interrupted {
                report.interrupted = true;
                break;
            }
        }

        report.absorb_metrics(&aggregator);

        report.persistence = if self.options.dry_run {
            tracing::info!("Dry run: company dataset not written");
            PersistenceStatus::Skipped
        } else {
            match store.persist() {
                Ok(()) => PersistenceStatus::Persisted,
                Err(e) => {
                    crate::log_error_with_context!(&e, "Failed to persist company dataset");
                    PersistenceStatus::Failed(e.to_string())
                }
            }
        };

        let report = report.with_duration(start_time.elapsed());
        report.log_summary();

        Ok(report)
    }
}
