//! Concurrent fetch engine
//!
//! Drives the lookups of one country group: sequential batches, bounded
//! concurrency inside a batch, and a consecutive-failure circuit breaker
//! that spans the whole group.

use super::metrics::CountryMetrics;
use super::progress::{ProgressSink, ProgressUpdate};
use crate::adapters::country::{AdapterRegistry, CountryAdapter};
use crate::domain::{Candidate, CompanyId, CountryCode, EnrichError, EnrichmentResult, Result};
use futures::stream::{self, StreamExt};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Engine settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Ids per dispatch round
    pub batch_size: usize,

    /// Maximum in-flight lookups
    pub concurrency: usize,

    /// Pause between batches
    pub inter_batch_delay: Duration,

    /// Upper bound on a single lookup
    pub per_fetch_timeout: Duration,

    /// Consecutive sentinel results that stop the group
    pub max_consecutive_failures: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            batch_size: 100,
            concurrency: 3,
            inter_batch_delay: Duration::from_secs(1),
            per_fetch_timeout: Duration::from_secs(30),
            max_consecutive_failures: 5,
        }
    }
}

/// Results of one country group
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Every result produced, in completion order
    pub results: Vec<(Candidate, EnrichmentResult)>,

    /// The circuit breaker stopped the group
    pub breaker_tripped: bool,

    /// Shutdown was requested between batches
    pub interrupted: bool,
}

/// Country group runner
pub struct FetchEngine<'a> {
    config: &'a FetchConfig,
    progress: &'a dyn ProgressSink,
    shutdown: Option<watch::Receiver<bool>>,
}

impl<'a> FetchEngine<'a> {
    pub fn new(config: &'a FetchConfig, progress: &'a dyn ProgressSink) -> Self {
        Self {
            config,
            progress,
            shutdown: None,
        }
    }

    /// Stop between batches once `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Fetch every id of `country`
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::InvariantViolation`] if `country` has no
    /// registered adapter. No other failure escapes.
    pub async fn run(
        &self,
        registry: &AdapterRegistry,
        country: CountryCode,
        ids: &[CompanyId],
        metrics: &mut CountryMetrics,
    ) -> Result<FetchOutcome> {
        let adapter = registry.get(country).map_err(|e| {
            EnrichError::InvariantViolation(format!(
                "country {country} reached the fetch stage without an adapter: {e}"
            ))
        })?;

        let mut outcome = FetchOutcome::default();
        let batch_size = self.config.batch_size.max(1);
        let concurrency = self.config.concurrency.max(1);
        let max_failures = self.config.max_consecutive_failures.max(1);
        let batches: Vec<&[CompanyId]> = ids.chunks(batch_size).collect();
        let total = ids.len();
        let mut consecutive_failures = 0usize;

        for (index, batch) in batches.iter().enumerate() {
            if index > 0 {
                if self.shutdown_requested() {
                    tracing::warn!(country = %country, "Shutdown requested, stopping after current batch");
                    outcome.interrupted = true;
                    break;
                }
                tokio::time::sleep(self.config.inter_batch_delay).await;
            }

            crate::log_batch_processing!(country, index + 1, batches.len());

            let timeout = self.config.per_fetch_timeout;
            let mut in_flight = stream::iter(batch.iter().cloned())
                .map(|id| {
                    let adapter = Arc::clone(&adapter);
                    async move {
                        let result = guarded_fetch(adapter.as_ref(), &id, timeout).await;
                        (id, result)
                    }
                })
                .buffer_unordered(concurrency);

            while let Some((id, result)) = in_flight.next().await {
                metrics.record(&id, &result);

                if result.is_sentinel() {
                    consecutive_failures += 1;
                } else {
                    consecutive_failures = 0;
                }

                self.progress.on_progress(&ProgressUpdate {
                    country,
                    fraction: metrics.fraction(),
                    message: format!("Processing {}: {}/{}", country, metrics.processed(), total),
                    metrics: metrics.snapshot(),
                });

                outcome.results.push((Candidate::new(country, id), result));

                if consecutive_failures >= max_failures {
                    outcome.breaker_tripped = true;
                    break;
                }
            }

            if outcome.breaker_tripped {
                // Dropping the stream cancels lookups still in flight
                drop(in_flight);
                metrics.push_line(format!(
                    "{country}: stopped after {consecutive_failures} consecutive failures"
                ));
                tracing::warn!(
                    country = %country,
                    consecutive_failures,
                    processed = metrics.processed(),
                    remaining = total - metrics.processed(),
                    "Circuit breaker tripped"
                );
                break;
            }
        }

        self.progress
            .on_country_complete(country, outcome.breaker_tripped);

        Ok(outcome)
    }
}

/// One lookup under a timeout, with panics contained
async fn guarded_fetch(
    adapter: &dyn CountryAdapter,
    id: &CompanyId,
    timeout: Duration,
) -> EnrichmentResult {
    let country = adapter.country();
    match tokio::time::timeout(timeout, AssertUnwindSafe(adapter.fetch(id)).catch_unwind()).await
    {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => {
            crate::log_fetch_failure!(country, id, "adapter panicked");
            EnrichmentResult::sentinel()
        }
        Err(_) => {
            crate::log_fetch_failure!(country, id, format!("timed out after {timeout:?}"));
            EnrichmentResult::sentinel()
        }
    }
}
