//! Identity reconciliation
//!
//! Splits raw vendor identities into ids the store already knows and ids that
//! need a registry lookup. Reconciliation is a pure function of the input and
//! the store's key set.

use crate::domain::{Candidate, CompanyId, CountryCode, VendorIdentity};
use std::collections::{BTreeMap, HashSet};

/// Outcome of reconciling a vendor list against the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Candidates whose id is already in the store
    pub known: Vec<Candidate>,

    /// Candidates that need a lookup
    pub new: Vec<Candidate>,

    /// Identities whose country has no registry
    pub skipped_unsupported: Vec<VendorIdentity>,

    /// Identities with a malformed id
    pub skipped_invalid: usize,

    /// Later occurrences of an id already seen in the same input
    pub duplicates_dropped: usize,
}

impl Reconciliation {
    /// Ids grouped by country, in run order
    ///
    /// With `include_known` the known candidates are scheduled too.
    pub fn by_country(&self, include_known: bool) -> BTreeMap<CountryCode, Vec<CompanyId>> {
        let mut groups: BTreeMap<CountryCode, Vec<CompanyId>> = BTreeMap::new();
        let known = include_known.then_some(self.known.iter()).into_iter().flatten();
        for candidate in self.new.iter().chain(known) {
            groups
                .entry(candidate.country)
                .or_default()
                .push(candidate.id.clone());
        }
        groups
    }

    /// Ids of the `new` partition
    pub fn new_ids(&self) -> HashSet<&CompanyId> {
        self.new.iter().map(|c| &c.id).collect()
    }

    /// Ids of the `known` partition
    pub fn known_ids(&self) -> HashSet<&CompanyId> {
        self.known.iter().map(|c| &c.id).collect()
    }
}

/// Identity reconciler
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    strict_ids: bool,
}

impl Reconciler {
    /// Reconciler accepting any non-empty id
    pub fn new() -> Self {
        Self::default()
    }

    /// Require ids to be 6 to 15 digits
    pub fn with_strict_ids(mut self, strict: bool) -> Self {
        self.strict_ids = strict;
        self
    }

    fn validate_id(&self, raw: &str) -> Result<CompanyId, String> {
        if self.strict_ids {
            CompanyId::new_strict(raw)
        } else {
            CompanyId::new(raw)
        }
    }

    /// Partition `identities` against `store_keys`
    ///
    /// Malformed ids are counted first. The first occurrence of each id is
    /// kept and later ones dropped, whatever their country. Survivors with an
    /// unsupported country are set aside; the rest land in `known` or `new`.
    pub fn reconcile(
        &self,
        identities: &[VendorIdentity],
        store_keys: &HashSet<CompanyId>,
    ) -> Reconciliation {
        let mut out = Reconciliation::default();
        let mut seen: HashSet<CompanyId> = HashSet::new();

        for identity in identities {
            let id = match self.validate_id(&identity.id) {
                Ok(id) => id,
                Err(reason) => {
                    tracing::debug!(id = %identity.id, %reason, "Skipping malformed id");
                    out.skipped_invalid += 1;
                    continue;
                }
            };

            if !seen.insert(id.clone()) {
                out.duplicates_dropped += 1;
                continue;
            }

            let country: CountryCode = match identity.country.parse() {
                Ok(country) => country,
                Err(_) => {
                    out.skipped_unsupported.push(identity.clone());
                    continue;
                }
            };

            let candidate = Candidate::new(country, id);
            if store_keys.contains(&candidate.id) {
                out.known.push(candidate);
            } else {
                out.new.push(candidate);
            }
        }

        tracing::info!(
            input = identities.len(),
            known = out.known.len(),
            new = out.new.len(),
            unsupported = out.skipped_unsupported.len(),
            invalid = out.skipped_invalid,
            duplicates = out.duplicates_dropped,
            "Identities reconciled"
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> HashSet<CompanyId> {
        values.iter().map(|v| CompanyId::new(v).unwrap()).collect()
    }

    #[test]
    fn test_unsupported_country_and_duplicates() {
        let input = vec![
            VendorIdentity::new("FR", "111"),
            VendorIdentity::new("FR", "111"),
            VendorIdentity::new("BE", "222"),
            VendorIdentity::new("US", "333"),
        ];

        let out = Reconciler::new().reconcile(&input, &HashSet::new());

        assert!(out.known.is_empty());
        let new: HashSet<&str> = out.new.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(new, HashSet::from(["111", "222"]));
        assert_eq!(out.skipped_unsupported, vec![VendorIdentity::new("US", "333")]);
        assert_eq!(out.duplicates_dropped, 1);
    }

    #[test]
    fn test_known_ids_partition() {
        let input = vec![
            VendorIdentity::new("fr", " 111 "),
            VendorIdentity::new("DK", "444"),
        ];
        let out = Reconciler::new().reconcile(&input, &ids(&["111"]));

        assert_eq!(out.known.len(), 1);
        assert_eq!(out.known[0].country, CountryCode::Fr);
        assert_eq!(out.known[0].id.as_str(), "111");
        assert_eq!(out.new.len(), 1);
        assert_eq!(out.new[0].country, CountryCode::Dk);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let input = vec![
            VendorIdentity::new("FR", "111"),
            VendorIdentity::new("BE", "222"),
            VendorIdentity::new("XX", "333"),
            VendorIdentity::new("DK", ""),
        ];
        let keys = ids(&["222"]);
        let reconciler = Reconciler::new();

        assert_eq!(
            reconciler.reconcile(&input, &keys),
            reconciler.reconcile(&input, &keys)
        );
    }

    #[test]
    fn test_malformed_ids() {
        let input = vec![
            VendorIdentity::new("FR", "   "),
            VendorIdentity::new("FR", "12345"),
            VendorIdentity::new("FR", "123456789"),
        ];

        let lenient = Reconciler::new().reconcile(&input, &HashSet::new());
        assert_eq!(lenient.skipped_invalid, 1);
        assert_eq!(lenient.new.len(), 2);

        let strict = Reconciler::new()
            .with_strict_ids(true)
            .reconcile(&input, &HashSet::new());
        assert_eq!(strict.skipped_invalid, 2);
        assert_eq!(strict.new.len(), 1);
    }

    #[test]
    fn test_first_occurrence_wins_across_countries() {
        let input = vec![
            VendorIdentity::new("US", "111"),
            VendorIdentity::new("FR", "111"),
        ];
        let out = Reconciler::new().reconcile(&input, &HashSet::new());
        assert!(out.new.is_empty());
        assert_eq!(out.skipped_unsupported.len(), 1);
        assert_eq!(out.duplicates_dropped, 1);
    }

    #[test]
    fn test_by_country_groups() {
        let input = vec![
            VendorIdentity::new("DK", "3"),
            VendorIdentity::new("FR", "1"),
            VendorIdentity::new("FR", "2"),
        ];
        let out = Reconciler::new().reconcile(&input, &ids(&["2"]));

        let groups = out.by_country(false);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![CountryCode::Fr, CountryCode::Dk]);
        assert_eq!(groups[&CountryCode::Fr].len(), 1);

        let refresh = out.by_country(true);
        assert_eq!(refresh[&CountryCode::Fr].len(), 2);
    }
}
