//! Company store abstraction
//!
//! The store is the single mutable resource of a run. It is written only by
//! the merge stage and persisted once, at the end of the run.

pub mod csv;
pub mod memory;
pub mod stats;

pub use self::csv::CsvCompanyStore;
pub use memory::MemoryStore;
pub use stats::{IntegrityReport, StoreStats};

use crate::domain::errors::StoreError;
use crate::domain::{CompanyId, CompanyRecord, Result};
use std::collections::{HashMap, HashSet};

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed for the id
    Inserted,
    /// An existing record was replaced
    Updated,
}

/// Company store trait
///
/// Implementations keep at most one record per id.
pub trait CompanyStore: Send {
    /// Ids of every record
    fn keys(&self) -> HashSet<CompanyId>;

    /// Record for `id`, if any
    fn get(&self, id: &CompanyId) -> Option<&CompanyRecord>;

    /// Insert or replace the record keyed by `record.id`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MalformedRecord`] if the record fails validation.
    fn upsert(&mut self, record: CompanyRecord) -> Result<UpsertOutcome>;

    /// Durably write the current state
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::PersistFailed`] if the write does not complete.
    fn persist(&mut self) -> Result<()>;

    /// All records, in insertion order
    fn records(&self) -> &[CompanyRecord];

    /// Number of records
    fn len(&self) -> usize {
        self.records().len()
    }

    /// True when the store holds no records
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insertion-ordered records with an id index
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordSet {
    records: Vec<CompanyRecord>,
    index: HashMap<CompanyId, usize>,
}

impl RecordSet {
    pub(crate) fn keys(&self) -> HashSet<CompanyId> {
        self.index.keys().cloned().collect()
    }

    pub(crate) fn get(&self, id: &CompanyId) -> Option<&CompanyRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    pub(crate) fn contains(&self, id: &CompanyId) -> bool {
        self.index.contains_key(id)
    }

    pub(crate) fn upsert(&mut self, record: CompanyRecord) -> Result<UpsertOutcome> {
        record.validate().map_err(|reason| StoreError::MalformedRecord {
            id: record.id.to_string(),
            reason,
        })?;

        match self.index.get(&record.id) {
            Some(&i) => {
                self.records[i] = record;
                Ok(UpsertOutcome::Updated)
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    /// Append without validation; the caller has checked the id is new
    pub(crate) fn push_loaded(&mut self, record: CompanyRecord) {
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
    }

    pub(crate) fn records(&self) -> &[CompanyRecord] {
        &self.records
    }
}

/// Records whose name or id contains `query`, case-insensitively
pub fn search<'a>(records: &'a [CompanyRecord], query: &str) -> Vec<&'a CompanyRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle) || r.id.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}
