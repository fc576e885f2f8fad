//! In-memory company store

use super::{CompanyStore, RecordSet, UpsertOutcome};
use crate::domain::{CompanyId, CompanyRecord, Result};
use std::collections::HashSet;

/// Volatile store used for dry runs and tests
///
/// `persist` only counts how often it was called.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: RecordSet,
    persist_count: usize,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `records`, later duplicates replacing earlier ones
    ///
    /// # Errors
    ///
    /// Returns an error if a record fails validation.
    pub fn with_records(records: impl IntoIterator<Item = CompanyRecord>) -> Result<Self> {
        let mut store = Self::new();
        for record in records {
            store.records.upsert(record)?;
        }
        Ok(store)
    }

    /// Number of successful `persist` calls
    pub fn persist_count(&self) -> usize {
        self.persist_count
    }
}

impl CompanyStore for MemoryStore {
    fn keys(&self) -> HashSet<CompanyId> {
        self.records.keys()
    }

    fn get(&self, id: &CompanyId) -> Option<&CompanyRecord> {
        self.records.get(id)
    }

    fn upsert(&mut self, record: CompanyRecord) -> Result<UpsertOutcome> {
        self.records.upsert(record)
    }

    fn persist(&mut self) -> Result<()> {
        self.persist_count += 1;
        Ok(())
    }

    fn records(&self) -> &[CompanyRecord] {
        self.records.records()
    }
}
