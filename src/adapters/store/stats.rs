//! Dataset statistics and integrity checks

use crate::domain::{CompanyRecord, CountryCode};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Summary of the company dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreStats {
    /// Total records
    pub total: usize,

    /// Records per country
    pub per_country: BTreeMap<CountryCode, usize>,

    /// Records whose name is unknown
    pub unknown_names: usize,

    /// Percentage of records with a non-empty L1 classification
    pub l1_fill_pct: f64,

    /// Percentage of records with a non-empty L2 classification
    pub l2_fill_pct: f64,

    /// Percentage of records with a non-empty L3 classification
    pub l3_fill_pct: f64,
}

impl StoreStats {
    /// Compute statistics over `records`
    pub fn from_records(records: &[CompanyRecord]) -> Self {
        let total = records.len();
        let mut per_country = BTreeMap::new();
        let mut unknown_names = 0;
        let (mut l1, mut l2, mut l3) = (0usize, 0usize, 0usize);

        for record in records {
            *per_country.entry(record.country).or_insert(0) += 1;
            if record.is_unknown() {
                unknown_names += 1;
            }
            l1 += usize::from(!record.classification_l1.trim().is_empty());
            l2 += usize::from(!record.classification_l2.trim().is_empty());
            l3 += usize::from(!record.classification_l3.trim().is_empty());
        }

        let pct = |n: usize| {
            if total == 0 {
                0.0
            } else {
                n as f64 / total as f64 * 100.0
            }
        };

        Self {
            total,
            per_country,
            unknown_names,
            l1_fill_pct: pct(l1),
            l2_fill_pct: pct(l2),
            l3_fill_pct: pct(l3),
        }
    }
}

/// Problems found in a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    /// Ids that appear more than once
    pub duplicate_ids: Vec<String>,

    /// `(id, country)` rows whose country is not supported
    pub invalid_countries: Vec<(String, String)>,

    /// `(id, column)` rows with an empty required column
    pub missing_fields: Vec<(String, String)>,
}

impl IntegrityReport {
    /// True when no problem was found
    pub fn is_clean(&self) -> bool {
        self.duplicate_ids.is_empty()
            && self.invalid_countries.is_empty()
            && self.missing_fields.is_empty()
    }

    /// Total number of problems
    pub fn issue_count(&self) -> usize {
        self.duplicate_ids.len() + self.invalid_countries.len() + self.missing_fields.len()
    }

    /// Check well-formed records for duplicate ids and empty required fields
    pub fn check(records: &[CompanyRecord]) -> Self {
        let mut report = Self::default();
        let mut seen = HashSet::new();

        for record in records {
            if !seen.insert(record.id.as_str()) {
                report.duplicate_ids.push(record.id.to_string());
            }
            for (column, value) in [
                ("Company Name", &record.name),
                ("Local Activity Code", &record.activity_code),
                ("Local Activity Code Description", &record.activity_description),
            ] {
                if value.trim().is_empty() {
                    report
                        .missing_fields
                        .push((record.id.to_string(), column.to_string()));
                }
            }
        }

        report
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: IntegrityReport) {
        self.duplicate_ids.extend(other.duplicate_ids);
        self.invalid_countries.extend(other.invalid_countries);
        self.missing_fields.extend(other.missing_fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candidate, CompanyId, EnrichmentResult};

    fn record(country: CountryCode, id: &str, name: Option<&str>) -> CompanyRecord {
        CompanyRecord::from_enrichment(
            &Candidate::new(country, CompanyId::new(id).unwrap()),
            &EnrichmentResult::from_raw(name, Some("1"), Some("x")),
        )
    }

    #[test]
    fn test_stats_counts_and_fill_rates() {
        let mut a = record(CountryCode::Fr, "1", Some("A"));
        a.classification_l1 = "IT".to_string();
        let b = record(CountryCode::Fr, "2", None);
        let c = record(CountryCode::Dk, "3", Some("C"));

        let stats = StoreStats::from_records(&[a, b, c]);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.per_country.get(&CountryCode::Fr), Some(&2));
        assert_eq!(stats.per_country.get(&CountryCode::Dk), Some(&1));
        assert_eq!(stats.unknown_names, 1);
        assert!((stats.l1_fill_pct - 33.333).abs() < 0.01);
        assert_eq!(stats.l2_fill_pct, 0.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = StoreStats::from_records(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.l1_fill_pct, 0.0);
    }

    #[test]
    fn test_integrity_check() {
        let a = record(CountryCode::Fr, "1", Some("A"));
        let mut b = record(CountryCode::Be, "1", Some("B"));
        b.activity_code = " ".to_string();

        let report = IntegrityReport::check(&[a, b]);
        assert_eq!(report.duplicate_ids, vec!["1".to_string()]);
        assert_eq!(
            report.missing_fields,
            vec![("1".to_string(), "Local Activity Code".to_string())]
        );
        assert_eq!(report.issue_count(), 2);
        assert!(!report.is_clean());
    }
}
