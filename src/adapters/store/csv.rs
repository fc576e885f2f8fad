//! CSV-backed company store
//!
//! The dataset is one CSV file with the legacy column headers. Loading is
//! tolerant: rows the pipeline cannot own (unsupported country, empty id) are
//! kept aside and written back unchanged, and duplicate ids keep their first
//! row. Ids of kept-aside rows still count as keys, so an upsert for such an
//! id takes the row over instead of adding a second one. Persisting writes a sibling temp file and renames it over the target
//! so readers never observe a half-written dataset.

use super::stats::IntegrityReport;
use super::{CompanyStore, RecordSet, UpsertOutcome};
use crate::domain::errors::StoreError;
use crate::domain::{CompanyId, CompanyRecord, CountryCode, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A dataset row with every column as text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct RawRow {
    #[serde(rename = "Vendor Country", default)]
    country: String,
    #[serde(rename = "Company SIREN", default)]
    id: String,
    #[serde(rename = "Company Name", default)]
    name: String,
    #[serde(rename = "Local Activity Code", default)]
    activity_code: String,
    #[serde(rename = "Local Activity Code Description", default)]
    activity_description: String,
    #[serde(rename = "L1 Classification", default)]
    classification_l1: String,
    #[serde(rename = "L2 Classification", default)]
    classification_l2: String,
    #[serde(rename = "L3 Classification", default)]
    classification_l3: String,
}

/// File-backed company store
#[derive(Debug)]
pub struct CsvCompanyStore {
    path: PathBuf,
    records: RecordSet,
    retained: Vec<RawRow>,
    retained_index: HashMap<CompanyId, usize>,
    load_report: IntegrityReport,
}

impl CsvCompanyStore {
    /// Open the dataset at `path`; a missing file yields an empty store
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LoadFailed`] if the file exists but cannot be
    /// read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut store = Self {
            path,
            records: RecordSet::default(),
            retained: Vec::new(),
            retained_index: HashMap::new(),
            load_report: IntegrityReport::default(),
        };

        if !store.path.exists() {
            tracing::info!(path = %store.path.display(), "Company dataset not found, starting empty");
            return Ok(store);
        }

        let mut reader = ::csv::ReaderBuilder::new()
            .trim(::csv::Trim::All)
            .flexible(true)
            .from_path(&store.path)
            .map_err(|e| load_failed(&store.path, e))?;

        for row in reader.deserialize::<RawRow>() {
            let row = row.map_err(|e| load_failed(&store.path, e))?;
            store.ingest(row);
        }

        let extra = IntegrityReport::check(store.records.records());
        store.load_report.merge(IntegrityReport {
            missing_fields: extra.missing_fields,
            ..IntegrityReport::default()
        });

        tracing::info!(
            path = %store.path.display(),
            records = store.records.records().len(),
            retained = store.retained.len(),
            issues = store.load_report.issue_count(),
            "Company dataset loaded"
        );

        Ok(store)
    }

    fn ingest(&mut self, row: RawRow) {
        let id = match CompanyId::new(&row.id) {
            Ok(id) => id,
            Err(_) => {
                self.load_report
                    .missing_fields
                    .push((String::new(), "Company SIREN".to_string()));
                self.retained.push(row);
                return;
            }
        };

        if self.records.contains(&id) || self.retained_index.contains_key(&id) {
            tracing::warn!(id = %id, "Duplicate id in company dataset, keeping first row");
            self.load_report.duplicate_ids.push(id.into_inner());
            return;
        }

        let country: CountryCode = match row.country.parse() {
            Ok(country) => country,
            Err(_) => {
                self.load_report
                    .invalid_countries
                    .push((id.to_string(), row.country.clone()));
                self.retained_index.insert(id, self.retained.len());
                self.retained.push(row);
                return;
            }
        };

        self.records.push_loaded(CompanyRecord {
            country,
            id,
            name: row.name,
            activity_code: row.activity_code,
            activity_description: row.activity_description,
            classification_l1: row.classification_l1,
            classification_l2: row.classification_l2,
            classification_l3: row.classification_l3,
        });
    }

    /// Path of the dataset file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Problems found while loading
    pub fn load_report(&self) -> &IntegrityReport {
        &self.load_report
    }

    /// Rows kept aside because the pipeline cannot own them
    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }

    /// Replace the kept-aside row for `record.id`, carrying its classification over
    fn take_over_retained(&mut self, mut record: CompanyRecord, pos: usize) -> Result<UpsertOutcome> {
        let row = &self.retained[pos];
        record.classification_l1 = row.classification_l1.clone();
        record.classification_l2 = row.classification_l2.clone();
        record.classification_l3 = row.classification_l3.clone();
        let id = record.id.clone();

        self.records.upsert(record)?;

        let row = self.retained.remove(pos);
        self.retained_index.remove(&id);
        for index in self.retained_index.values_mut() {
            if *index > pos {
                *index -= 1;
            }
        }

        tracing::info!(
            id = %id,
            previous_country = %row.country,
            "Kept-aside dataset row replaced by enriched record"
        );
        Ok(UpsertOutcome::Updated)
    }

    fn write_to(&self, file: &mut NamedTempFile) -> std::result::Result<(), String> {
        let mut writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file.as_file_mut());

        writer
            .write_record(CompanyRecord::COLUMNS)
            .map_err(|e| e.to_string())?;
        for record in self.records.records() {
            writer.serialize(record).map_err(|e| e.to_string())?;
        }
        for row in &self.retained {
            writer.serialize(row).map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())?;
        drop(writer);

        file.as_file_mut().flush().map_err(|e| e.to_string())?;
        file.as_file().sync_all().map_err(|e| e.to_string())
    }
}

fn load_failed(path: &Path, err: ::csv::Error) -> StoreError {
    StoreError::LoadFailed(format!("{}: {}", path.display(), err))
}

impl CompanyStore for CsvCompanyStore {
    fn keys(&self) -> HashSet<CompanyId> {
        let mut keys = self.records.keys();
        keys.extend(self.retained_index.keys().cloned());
        keys
    }

    /// Kept-aside rows have no [`CompanyRecord`] form and are never returned
    fn get(&self, id: &CompanyId) -> Option<&CompanyRecord> {
        self.records.get(id)
    }

    fn upsert(&mut self, record: CompanyRecord) -> Result<UpsertOutcome> {
        match self.retained_index.get(&record.id) {
            Some(&pos) => self.take_over_retained(record, pos),
            None => self.records.upsert(record),
        }
    }

    fn persist(&mut self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&dir).map_err(|e| {
            StoreError::PersistFailed(format!("cannot create {}: {}", dir.display(), e))
        })?;

        let mut file = NamedTempFile::new_in(&dir).map_err(|e| {
            StoreError::PersistFailed(format!("cannot create temp file in {}: {}", dir.display(), e))
        })?;

        self.write_to(&mut file)
            .map_err(|e| StoreError::PersistFailed(format!("write failed: {e}")))?;

        file.persist(&self.path).map_err(|e| {
            StoreError::PersistFailed(format!("cannot replace {}: {}", self.path.display(), e.error))
        })?;

        tracing::info!(
            path = %self.path.display(),
            records = self.records.records().len(),
            "Company dataset persisted"
        );

        Ok(())
    }

    fn records(&self) -> &[CompanyRecord] {
        self.records.records()
    }
}
