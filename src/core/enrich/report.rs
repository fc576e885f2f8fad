//! Run report
//!
//! This module defines the structures returned to the caller at the end of
//! an enrichment run.

use crate::core::merge::MergeOutcome;
use crate::core::metrics::{success_rate, CountryMetrics, MetricsAggregator};
use crate::domain::CountryCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use uuid::Uuid;

/// What happened to the store at the end of the run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PersistenceStatus {
    /// Dataset written durably
    Persisted,
    /// Write skipped (dry run)
    Skipped,
    /// Write failed; in-memory results were not saved
    Failed(String),
}

/// Results for one country group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CountryReport {
    /// Ids scheduled for lookup
    pub candidates: usize,

    /// Lookups completed
    pub processed: usize,

    /// Lookups whose name came back unknown
    pub fetch_errors: usize,

    /// Store changes
    pub merge: MergeOutcome,

    /// The circuit breaker stopped the group early
    pub breaker_tripped: bool,
}

impl CountryReport {
    /// Report for a finished group, fetch counts taken from its metrics
    pub fn new(metrics: &CountryMetrics, merge: MergeOutcome, breaker_tripped: bool) -> Self {
        Self {
            candidates: metrics.total_candidates(),
            processed: metrics.processed(),
            fetch_errors: metrics.errors(),
            merge,
            breaker_tripped,
        }
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed, self.fetch_errors)
    }
}

/// Summary of an enrichment run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Identifier logged at the start and end of the run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Ids scheduled for lookup across all countries
    pub total_candidates: usize,

    /// Input ids already present in the store
    pub known: usize,

    /// Lookups completed
    pub processed: usize,

    /// Records inserted
    pub added: usize,

    /// Records overwritten
    pub updated: usize,

    /// Identities with an unsupported country
    pub skipped_unsupported: usize,

    /// Identities with a malformed id
    pub skipped_invalid: usize,

    /// Repeated ids dropped from the input
    pub duplicates_dropped: usize,

    /// Lookups whose name came back unknown
    pub fetch_errors: usize,

    /// Pairs the store rejected
    pub merge_errors: usize,

    /// Fetch and merge errors combined
    pub errors: usize,

    /// Per-country breakdown, in run order
    pub per_country: BTreeMap<CountryCode, CountryReport>,

    /// Shutdown stopped the run early
    pub interrupted: bool,

    /// Run executed without writing the dataset
    pub dry_run: bool,

    /// Outcome of the final write
    pub persistence: PersistenceStatus,

    /// Wall-clock duration
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl RunReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total_candidates: 0,
            known: 0,
            processed: 0,
            added: 0,
            updated: 0,
            skipped_unsupported: 0,
            skipped_invalid: 0,
            duplicates_dropped: 0,
            fetch_errors: 0,
            merge_errors: 0,
            errors: 0,
            per_country: BTreeMap::new(),
            interrupted: false,
            dry_run: false,
            persistence: PersistenceStatus::Skipped,
            duration: Duration::ZERO,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a finished country group and fold its merge counts in
    ///
    /// Fetch totals are not summed here; they come from
    /// [`absorb_metrics`](Self::absorb_metrics).
    pub fn add_country(&mut self, country: CountryCode, report: CountryReport) {
        self.added += report.merge.added;
        self.updated += report.merge.updated;
        self.merge_errors += report.merge.errors;
        self.errors = self.fetch_errors + self.merge_errors;
        self.per_country.insert(country, report);
    }

    /// Take candidate, processed and fetch error totals from the run metrics
    pub fn absorb_metrics(&mut self, metrics: &MetricsAggregator) {
        self.total_candidates = metrics.total_candidates();
        self.processed = metrics.processed();
        self.fetch_errors = metrics.errors();
        self.errors = self.fetch_errors + self.merge_errors;
    }

    /// Countries whose circuit breaker tripped
    pub fn tripped_countries(&self) -> Vec<CountryCode> {
        self.per_country
            .iter()
            .filter(|(_, r)| r.breaker_tripped)
            .map(|(c, _)| *c)
            .collect()
    }

    /// True if the final write failed
    pub fn persistence_failed(&self) -> bool {
        matches!(self.persistence, PersistenceStatus::Failed(_))
    }

    /// True when every lookup and upsert succeeded and the store was saved
    pub fn is_successful(&self) -> bool {
        self.errors == 0 && self.tripped_countries().is_empty() && !self.persistence_failed()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed, self.fetch_errors)
    }

    /// Log the report
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            total_candidates = self.total_candidates,
            known = self.known,
            processed = self.processed,
            added = self.added,
            updated = self.updated,
            skipped_unsupported = self.skipped_unsupported,
            skipped_invalid = self.skipped_invalid,
            duplicates_dropped = self.duplicates_dropped,
            errors = self.errors,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            dry_run = self.dry_run,
            "Enrichment completed"
        );

        for (country, report) in &self.per_country {
            tracing::info!(
                run_id = %self.run_id,
                country = %country,
                candidates = report.candidates,
                processed = report.processed,
                errors = report.fetch_errors,
                added = report.merge.added,
                updated = report.merge.updated,
                breaker_tripped = report.breaker_tripped,
                success_rate = format!("{:.2}%", report.success_rate()),
                "Country summary"
            );
        }

        if self.interrupted {
            tracing::warn!("Run interrupted by shutdown request; remaining ids were not fetched");
        }

        if let PersistenceStatus::Failed(reason) = &self.persistence {
            tracing::error!(reason = %reason, "Company dataset was not saved");
        }
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanyId, EnrichmentResult};

    fn id(raw: &str) -> CompanyId {
        CompanyId::new(raw).unwrap()
    }

    fn country(processed: usize, errors: usize, tripped: bool) -> CountryReport {
        CountryReport {
            candidates: processed + 2,
            processed,
            fetch_errors: errors,
            merge: MergeOutcome {
                added: processed,
                updated: 0,
                errors: 0,
            },
            breaker_tripped: tripped,
        }
    }

    #[test]
    fn test_add_country_accumulates_merge_counts() {
        let mut report = RunReport::new();
        report.add_country(CountryCode::Fr, country(4, 1, false));
        report.add_country(CountryCode::Dk, country(5, 5, true));

        assert_eq!(report.added, 9);
        assert_eq!(report.merge_errors, 0);
        assert_eq!(report.per_country.len(), 2);
        assert_eq!(report.tripped_countries(), vec![CountryCode::Dk]);
        assert!(!report.is_successful());
    }

    #[test]
    fn test_fetch_totals_come_from_metrics() {
        let mut fr = CountryMetrics::new(CountryCode::Fr, 3);
        let mut dk = CountryMetrics::new(CountryCode::Dk, 4);
        let found = EnrichmentResult::from_raw(Some("ACME"), Some("62.01Z"), None);
        fr.record(&id("111"), &found);
        fr.record(&id("222"), &EnrichmentResult::sentinel());
        dk.record(&id("333"), &found);

        let mut report = RunReport::new();
        report.add_country(
            CountryCode::Fr,
            CountryReport::new(&fr, MergeOutcome { added: 1, updated: 0, errors: 1 }, false),
        );
        report.add_country(CountryCode::Dk, CountryReport::new(&dk, MergeOutcome::default(), false));

        let mut metrics = MetricsAggregator::new();
        metrics.absorb(fr);
        metrics.absorb(dk);
        report.absorb_metrics(&metrics);

        assert_eq!(report.total_candidates, metrics.total_candidates());
        assert_eq!(report.total_candidates, 7);
        assert_eq!(report.processed, 3);
        assert_eq!(report.fetch_errors, 1);
        assert_eq!(report.errors, 2);
        assert_eq!(report.success_rate(), metrics.success_rate());
        assert_eq!(report.per_country[&CountryCode::Fr].processed, 2);
        assert_eq!(report.per_country[&CountryCode::Fr].fetch_errors, 1);
    }

    #[test]
    fn test_empty_report_is_successful() {
        let report = RunReport::new();
        assert!(report.is_successful());
        assert_eq!(report.success_rate(), 0.0);
    }

    #[test]
    fn test_persistence_failure_is_not_successful() {
        let mut report = RunReport::new();
        report.persistence = PersistenceStatus::Failed("disk full".to_string());
        assert!(report.persistence_failed());
        assert!(!report.is_successful());
    }

    #[test]
    fn test_report_serializes() {
        let report = RunReport::new().with_duration(Duration::from_millis(1500));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["duration"], 1.5);
        assert_eq!(json["persistence"], "Skipped");
        assert_eq!(json["run_id"], report.run_id.to_string());
    }
}
