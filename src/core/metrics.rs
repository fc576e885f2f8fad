//! Run metrics
//!
//! Counters are plain values owned by the coordinator and lent to each stage;
//! nothing here is shared or global.

use crate::domain::{CompanyId, CountryCode, EnrichmentResult};
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

/// Number of status lines carried in a snapshot
pub const RECENT_LOG_LINES: usize = 10;

/// `(processed - errors) / max(processed, 1) * 100`
pub fn success_rate(processed: usize, errors: usize) -> f64 {
    processed.saturating_sub(errors) as f64 / processed.max(1) as f64 * 100.0
}

/// Point-in-time view handed to progress sinks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub errors: usize,
    pub success_rate: f64,
    pub recent_logs: Vec<String>,
}

/// Counters for one country group
#[derive(Debug, Clone)]
pub struct CountryMetrics {
    country: CountryCode,
    total_candidates: usize,
    processed: usize,
    errors: usize,
    recent: VecDeque<String>,
}

impl CountryMetrics {
    /// Fresh counters for `total_candidates` ids
    pub fn new(country: CountryCode, total_candidates: usize) -> Self {
        Self {
            country,
            total_candidates,
            processed: 0,
            errors: 0,
            recent: VecDeque::with_capacity(RECENT_LOG_LINES),
        }
    }

    /// Count one fetched result
    pub fn record(&mut self, id: &CompanyId, result: &EnrichmentResult) {
        self.processed += 1;
        let line = if result.is_error() {
            self.errors += 1;
            format!("{} {}: no data", self.country, id)
        } else {
            format!("{} {}: {}", self.country, id, result.name_or_sentinel())
        };
        self.push_line(line);
    }

    /// Append a status line to the bounded tail
    pub fn push_line(&mut self, line: String) {
        if self.recent.len() == RECENT_LOG_LINES {
            self.recent.pop_front();
        }
        self.recent.push_back(line);
    }

    pub fn country(&self) -> CountryCode {
        self.country
    }

    pub fn total_candidates(&self) -> usize {
        self.total_candidates
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Fraction of candidates processed, in `0.0..=1.0`
    pub fn fraction(&self) -> f64 {
        if self.total_candidates == 0 {
            1.0
        } else {
            (self.processed as f64 / self.total_candidates as f64).min(1.0)
        }
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed, self.errors)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            processed: self.processed,
            errors: self.errors,
            success_rate: self.success_rate(),
            recent_logs: self.recent.iter().cloned().collect(),
        }
    }
}

/// Run-wide totals built from finished country groups
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    countries: BTreeMap<CountryCode, CountryMetrics>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished group in, replacing an earlier one for the same country
    pub fn absorb(&mut self, metrics: CountryMetrics) {
        self.countries.insert(metrics.country, metrics);
    }

    pub fn country(&self, country: CountryCode) -> Option<&CountryMetrics> {
        self.countries.get(&country)
    }

    pub fn total_candidates(&self) -> usize {
        self.countries.values().map(|m| m.total_candidates).sum()
    }

    pub fn processed(&self) -> usize {
        self.countries.values().map(|m| m.processed).sum()
    }

    pub fn errors(&self) -> usize {
        self.countries.values().map(|m| m.errors).sum()
    }

    pub fn success_rate(&self) -> f64 {
        success_rate(self.processed(), self.errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> CompanyId {
        CompanyId::new(n.to_string()).unwrap()
    }

    #[test]
    fn test_success_rate_formula() {
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(4, 1), 75.0);
        assert_eq!(success_rate(2, 2), 0.0);
    }

    #[test]
    fn test_country_metrics_counts_errors_by_name() {
        let mut metrics = CountryMetrics::new(CountryCode::Fr, 3);
        metrics.record(&id(1), &EnrichmentResult::from_raw(Some("ACME"), None, None));
        metrics.record(&id(2), &EnrichmentResult::from_raw(None, Some("62.01Z"), None));

        assert_eq!(metrics.processed(), 2);
        assert_eq!(metrics.errors(), 1);
        assert_eq!(metrics.success_rate(), 50.0);
        assert!((metrics.fraction() - 2.0 / 3.0).abs() < f64::EPSILON);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.recent_logs, vec!["FR 1: ACME", "FR 2: no data"]);
    }

    #[test]
    fn test_recent_tail_is_bounded() {
        let mut metrics = CountryMetrics::new(CountryCode::Dk, 20);
        for n in 0..15 {
            metrics.record(&id(n), &EnrichmentResult::sentinel());
        }
        let tail = metrics.snapshot().recent_logs;
        assert_eq!(tail.len(), RECENT_LOG_LINES);
        assert_eq!(tail[0], "DK 5: no data");
    }

    #[test]
    fn test_aggregator_totals() {
        let mut fr = CountryMetrics::new(CountryCode::Fr, 2);
        fr.record(&id(1), &EnrichmentResult::from_raw(Some("A"), None, None));
        fr.record(&id(2), &EnrichmentResult::sentinel());
        let mut be = CountryMetrics::new(CountryCode::Be, 5);
        be.record(&id(3), &EnrichmentResult::from_raw(Some("B"), None, None));

        let mut aggregator = MetricsAggregator::new();
        aggregator.absorb(fr);
        aggregator.absorb(be);

        assert_eq!(aggregator.total_candidates(), 7);
        assert_eq!(aggregator.processed(), 3);
        assert_eq!(aggregator.errors(), 1);
        assert!((aggregator.success_rate() - 66.666).abs() < 0.01);
        assert_eq!(aggregator.country(CountryCode::Be).unwrap().processed(), 1);
    }
}
