//! Vendor list reader
//!
//! Reads a CSV export of the vendor master and maps two named columns onto
//! [`VendorIdentity`] values. Header matching ignores case and surrounding
//! whitespace.

use crate::domain::{EnrichError, Result, VendorIdentity};
use std::path::Path;

/// Identities read from a vendor list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorList {
    /// One identity per usable row, in file order
    pub identities: Vec<VendorIdentity>,

    /// Rows with an empty country or id
    pub skipped_rows: usize,
}

/// Read `(country, id)` pairs from the CSV file at `path`
///
/// # Errors
///
/// Returns [`EnrichError::Input`] if the file cannot be read, a named column
/// is missing, or a row cannot be parsed.
pub fn read_identities(
    path: impl AsRef<Path>,
    country_column: &str,
    id_column: &str,
) -> Result<VendorList> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| EnrichError::Input(format!("Cannot open {}: {}", path.display(), e)))?;

    let headers = reader.headers()?.clone();
    let country_idx = column_index(&headers, country_column)?;
    let id_idx = column_index(&headers, id_column)?;

    let mut list = VendorList::default();
    for record in reader.records() {
        let record = record?;
        let country = record.get(country_idx).unwrap_or("").trim();
        let id = record.get(id_idx).unwrap_or("").trim();

        if country.is_empty() || id.is_empty() {
            list.skipped_rows += 1;
            continue;
        }

        list.identities.push(VendorIdentity::new(country, id));
    }

    tracing::info!(
        path = %path.display(),
        identities = list.identities.len(),
        skipped_rows = list.skipped_rows,
        "Vendor list read"
    );

    Ok(list)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    let wanted = name.trim();
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            EnrichError::Input(format!(
                "Column '{}' not found. Available columns: {}",
                wanted,
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })
}
