//! Merge fetched results into the company store
//!
//! Fetched columns are overwritten, sentinel included. Classification
//! columns are initialised empty on insert and left alone afterwards.

use crate::adapters::store::{CompanyStore, UpsertOutcome};
use crate::domain::{Candidate, CompanyRecord, EnrichmentResult};
use serde::Serialize;

/// Counts from one merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Records inserted
    pub added: usize,

    /// Existing records overwritten
    pub updated: usize,

    /// Pairs rejected by the store
    pub errors: usize,
}

impl MergeOutcome {
    /// Add another outcome's counts to this one
    pub fn merge(&mut self, other: MergeOutcome) {
        self.added += other.added;
        self.updated += other.updated;
        self.errors += other.errors;
    }

    /// Pairs applied successfully
    pub fn applied(&self) -> usize {
        self.added + self.updated
    }
}

/// Build the row for `candidate`, preserving classification of an existing one
pub fn merged_record(
    existing: Option<&CompanyRecord>,
    candidate: &Candidate,
    result: &EnrichmentResult,
) -> CompanyRecord {
    match existing {
        Some(record) => {
            let mut record = record.clone();
            record.apply_enrichment(candidate.country, result);
            record
        }
        None => CompanyRecord::from_enrichment(candidate, result),
    }
}

/// Upsert every pair into `store`
///
/// A rejected pair is counted and skipped; the remaining pairs still apply.
pub fn merge_results(
    store: &mut dyn CompanyStore,
    results: &[(Candidate, EnrichmentResult)],
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for (candidate, result) in results {
        let record = merged_record(store.get(&candidate.id), candidate, result);
        match store.upsert(record) {
            Ok(UpsertOutcome::Inserted) => outcome.added += 1,
            Ok(UpsertOutcome::Updated) => outcome.updated += 1,
            Err(e) => {
                outcome.errors += 1;
                tracing::warn!(
                    country = %candidate.country,
                    id = %candidate.id,
                    error = %e,
                    "Upsert rejected, skipping"
                );
            }
        }
    }

    tracing::debug!(
        added = outcome.added,
        updated = outcome.updated,
        errors = outcome.errors,
        "Merge applied"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::MemoryStore;
    use crate::domain::errors::StoreError;
    use crate::domain::{CompanyId, CountryCode, EnrichError, Result};
    use std::collections::HashSet;

    /// Memory store refusing upserts for one id
    struct Rejecting {
        inner: MemoryStore,
        reject: CompanyId,
    }

    impl CompanyStore for Rejecting {
        fn keys(&self) -> HashSet<CompanyId> {
            self.inner.keys()
        }

        fn get(&self, id: &CompanyId) -> Option<&CompanyRecord> {
            self.inner.get(id)
        }

        fn upsert(&mut self, record: CompanyRecord) -> Result<UpsertOutcome> {
            if record.id == self.reject {
                return Err(EnrichError::Store(StoreError::MalformedRecord {
                    id: record.id.to_string(),
                    reason: "rejected".to_string(),
                }));
            }
            self.inner.upsert(record)
        }

        fn persist(&mut self) -> Result<()> {
            self.inner.persist()
        }

        fn records(&self) -> &[CompanyRecord] {
            self.inner.records()
        }
    }

    fn candidate(country: CountryCode, id: &str) -> Candidate {
        Candidate::new(country, CompanyId::new(id).unwrap())
    }

    fn found(name: &str, code: &str) -> EnrichmentResult {
        EnrichmentResult::from_raw(Some(name), Some(code), Some("desc"))
    }

    #[test]
    fn test_merge_inserts_then_updates() {
        let mut store = MemoryStore::new();
        let pair = (candidate(CountryCode::Fr, "111"), found("ACME", "62.01Z"));

        let first = merge_results(&mut store, std::slice::from_ref(&pair));
        assert_eq!(first, MergeOutcome { added: 1, updated: 0, errors: 0 });
        let after_once = store.get(&pair.0.id).cloned();

        let second = merge_results(&mut store, std::slice::from_ref(&pair));
        assert_eq!(second, MergeOutcome { added: 0, updated: 1, errors: 0 });
        assert_eq!(store.get(&pair.0.id).cloned(), after_once);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_merge_preserves_classification_and_overwrites_with_sentinel() {
        let c = candidate(CountryCode::Fr, "111");
        let mut seeded = CompanyRecord::from_enrichment(&c, &found("Old", "00.00Z"));
        seeded.classification_l1 = "IT Services".to_string();
        seeded.classification_l3 = "Cloud".to_string();
        let mut store = MemoryStore::with_records([seeded]).unwrap();

        merge_results(&mut store, &[(c.clone(), EnrichmentResult::sentinel())]);

        let record = store.get(&c.id).unwrap();
        assert_eq!(record.name, "N/A");
        assert_eq!(record.activity_code, "N/A");
        assert_eq!(record.classification_l1, "IT Services");
        assert_eq!(record.classification_l3, "Cloud");
    }

    #[test]
    fn test_merge_updates_country() {
        let c = candidate(CountryCode::Fr, "111");
        let mut store =
            MemoryStore::with_records([CompanyRecord::from_enrichment(&c, &found("A", "1"))])
                .unwrap();

        let moved = candidate(CountryCode::Be, "111");
        merge_results(&mut store, &[(moved.clone(), found("A", "1"))]);

        assert_eq!(store.get(&moved.id).unwrap().country, CountryCode::Be);
    }

    #[test]
    fn test_rejected_pair_is_skipped() {
        let mut store = Rejecting {
            inner: MemoryStore::new(),
            reject: CompanyId::new("222").unwrap(),
        };
        let pairs = [
            (candidate(CountryCode::Fr, "111"), found("A", "1")),
            (candidate(CountryCode::Fr, "222"), found("B", "2")),
            (candidate(CountryCode::Fr, "333"), found("C", "3")),
        ];

        let outcome = merge_results(&mut store, &pairs);

        assert_eq!(outcome, MergeOutcome { added: 2, updated: 0, errors: 1 });
        assert_eq!(store.len(), 2);
        assert!(store.get(&pairs[1].0.id).is_none());
        assert_eq!(store.get(&pairs[2].0.id).unwrap().name, "C");
    }

    #[test]
    fn test_outcome_merge() {
        let mut total = MergeOutcome { added: 1, updated: 2, errors: 0 };
        total.merge(MergeOutcome { added: 3, updated: 0, errors: 1 });
        assert_eq!(total, MergeOutcome { added: 4, updated: 2, errors: 1 });
        assert_eq!(total.applied(), 6);
    }
}
