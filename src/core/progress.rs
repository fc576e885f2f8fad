//! Progress reporting
//!
//! The fetch engine calls a [`ProgressSink`] once per completed lookup, from
//! its coordinating task. Calls are therefore never concurrent even though
//! lookups overlap.

use super::metrics::MetricsSnapshot;
use crate::domain::CountryCode;

/// One progress event
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Country group being processed
    pub country: CountryCode,

    /// Fraction of the group completed, `0.0..=1.0`
    pub fraction: f64,

    /// Short status line, e.g. `Processing FR: 3/10`
    pub message: String,

    /// Counters at the time of the event
    pub metrics: MetricsSnapshot,
}

/// Receiver of progress events
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, update: &ProgressUpdate);

    /// Called once when a country group finishes
    fn on_country_complete(&self, _country: CountryCode, _breaker_tripped: bool) {}
}

/// Sink that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&self, _update: &ProgressUpdate) {}
}

/// Sink that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&self, update: &ProgressUpdate) {
        tracing::debug!(
            country = %update.country,
            fraction = update.fraction,
            processed = update.metrics.processed,
            errors = update.metrics.errors,
            success_rate = format!("{:.1}%", update.metrics.success_rate),
            "{}",
            update.message
        );
    }

    fn on_country_complete(&self, country: CountryCode, breaker_tripped: bool) {
        tracing::info!(country = %country, breaker_tripped, "Country group finished");
    }
}
