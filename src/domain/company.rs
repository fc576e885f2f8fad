//! Company data model
//!
//! Input identities, per-fetch enrichment results and the persisted company
//! record. The record serialises with the column headers of the legacy
//! company dataset so existing spreadsheets exported to CSV load unchanged.

use super::ids::{CompanyId, CountryCode};
use serde::{Deserialize, Serialize};

/// Marker written to the store for a field that could not be obtained
pub const SENTINEL: &str = "N/A";

/// Raw vendor identity as supplied by the caller
///
/// Neither field is validated: the country may be unsupported and the id may
/// be empty. The reconciler decides what happens to each one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorIdentity {
    /// Country code as given (any case, possibly padded)
    pub country: String,

    /// External company identifier as given
    pub id: String,
}

impl VendorIdentity {
    /// Creates a new raw identity
    pub fn new(country: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            id: id.into(),
        }
    }
}

/// Validated identity with a supported country
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Supported country
    pub country: CountryCode,

    /// Validated company id
    pub id: CompanyId,
}

impl Candidate {
    /// Creates a new candidate
    pub fn new(country: CountryCode, id: CompanyId) -> Self {
        Self { country, id }
    }
}

/// Outcome of one adapter call
///
/// `None` in a field is the sentinel ("unknown"). A sentinel result is a
/// normal value, not an error: it is what every failed or empty extraction
/// degrades to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// Registered company name
    pub name: Option<String>,

    /// Local activity classification code (NAF, NACE-BEL, DB07)
    pub activity_code: Option<String>,

    /// Human-readable label of the activity code
    pub activity_description: Option<String>,
}

impl EnrichmentResult {
    /// All-sentinel result
    pub fn sentinel() -> Self {
        Self::default()
    }

    /// Builds a result from raw extracted strings, cleaning each field
    pub fn from_raw(
        name: Option<&str>,
        activity_code: Option<&str>,
        activity_description: Option<&str>,
    ) -> Self {
        Self {
            name: name.and_then(clean_company_name),
            activity_code: activity_code.and_then(clean_field),
            activity_description: activity_description.and_then(clean_field),
        }
    }

    /// True when every field is the sentinel
    pub fn is_sentinel(&self) -> bool {
        self.name.is_none() && self.activity_code.is_none() && self.activity_description.is_none()
    }

    /// True when the primary field (name) is the sentinel
    pub fn is_error(&self) -> bool {
        self.name.is_none()
    }

    /// Name as stored, sentinel rendered as `N/A`
    pub fn name_or_sentinel(&self) -> String {
        self.name.clone().unwrap_or_else(|| SENTINEL.to_string())
    }

    /// Activity code as stored
    pub fn activity_code_or_sentinel(&self) -> String {
        self.activity_code
            .clone()
            .unwrap_or_else(|| SENTINEL.to_string())
    }

    /// Activity description as stored
    pub fn activity_description_or_sentinel(&self) -> String {
        self.activity_description
            .clone()
            .unwrap_or_else(|| SENTINEL.to_string())
    }
}

/// Collapses whitespace; empty or `N/A` becomes the sentinel
pub fn clean_field(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() || collapsed == SENTINEL {
        None
    } else {
        Some(collapsed)
    }
}

/// Like [`clean_field`], also stripping double quotes
pub fn clean_company_name(raw: &str) -> Option<String> {
    clean_field(&raw.replace('"', ""))
}

/// One row of the company dataset
///
/// `id` is the primary key across the whole store regardless of country.
/// The three classification fields are curated outside the pipeline: they
/// are initialised empty on insert and never written afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Vendor Country")]
    pub country: CountryCode,

    #[serde(rename = "Company SIREN")]
    pub id: CompanyId,

    #[serde(rename = "Company Name")]
    pub name: String,

    #[serde(rename = "Local Activity Code")]
    pub activity_code: String,

    #[serde(rename = "Local Activity Code Description")]
    pub activity_description: String,

    #[serde(rename = "L1 Classification", default)]
    pub classification_l1: String,

    #[serde(rename = "L2 Classification", default)]
    pub classification_l2: String,

    #[serde(rename = "L3 Classification", default)]
    pub classification_l3: String,
}

impl CompanyRecord {
    /// Column headers of the persisted dataset, in order
    pub const COLUMNS: [&'static str; 8] = [
        "Vendor Country",
        "Company SIREN",
        "Company Name",
        "Local Activity Code",
        "Local Activity Code Description",
        "L1 Classification",
        "L2 Classification",
        "L3 Classification",
    ];

    /// New record from a fetch, with empty classification fields
    pub fn from_enrichment(candidate: &Candidate, result: &EnrichmentResult) -> Self {
        Self {
            country: candidate.country,
            id: candidate.id.clone(),
            name: result.name_or_sentinel(),
            activity_code: result.activity_code_or_sentinel(),
            activity_description: result.activity_description_or_sentinel(),
            classification_l1: String::new(),
            classification_l2: String::new(),
            classification_l3: String::new(),
        }
    }

    /// Overwrites the fetched fields, leaving classification untouched
    ///
    /// Sentinel values overwrite too, so a record mirrors the latest state
    /// of its source.
    pub fn apply_enrichment(&mut self, country: CountryCode, result: &EnrichmentResult) {
        self.country = country;
        self.name = result.name_or_sentinel();
        self.activity_code = result.activity_code_or_sentinel();
        self.activity_description = result.activity_description_or_sentinel();
    }

    /// True when the fetched name is unknown
    pub fn is_unknown(&self) -> bool {
        self.name == SENTINEL
    }

    /// Checks the row is well-formed before it is written
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Company Name cannot be empty (use N/A for unknown)".to_string());
        }
        if self.activity_code.trim().is_empty() {
            return Err("Local Activity Code cannot be empty (use N/A for unknown)".to_string());
        }
        if self.activity_description.trim().is_empty() {
            return Err(
                "Local Activity Code Description cannot be empty (use N/A for unknown)"
                    .to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(country: CountryCode, id: &str) -> Candidate {
        Candidate::new(country, CompanyId::new(id).unwrap())
    }

    #[test]
    fn test_sentinel_result() {
        let result = EnrichmentResult::sentinel();
        assert!(result.is_sentinel());
        assert!(result.is_error());
        assert_eq!(result.name_or_sentinel(), "N/A");
    }

    #[test]
    fn test_partial_result_is_not_sentinel() {
        let result = EnrichmentResult::from_raw(None, Some("62.01Z"), None);
        assert!(!result.is_sentinel());
        assert!(result.is_error());
    }

    #[test]
    fn test_from_raw_cleans_fields() {
        let result = EnrichmentResult::from_raw(
            Some("  \"ACME   Holding\"  "),
            Some(" 62.01Z "),
            Some(""),
        );
        assert_eq!(result.name.as_deref(), Some("ACME Holding"));
        assert_eq!(result.activity_code.as_deref(), Some("62.01Z"));
        assert_eq!(result.activity_description, None);
    }

    #[test]
    fn test_clean_field_treats_na_as_sentinel() {
        assert_eq!(clean_field("N/A"), None);
        assert_eq!(clean_field("   "), None);
    }

    #[test]
    fn test_record_from_enrichment_has_empty_classification() {
        let result = EnrichmentResult::from_raw(Some("ACME"), Some("62.01Z"), Some("Software"));
        let record = CompanyRecord::from_enrichment(&candidate(CountryCode::Fr, "111"), &result);

        assert_eq!(record.name, "ACME");
        assert!(record.classification_l1.is_empty());
        assert!(record.classification_l2.is_empty());
        assert!(record.classification_l3.is_empty());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_apply_enrichment_preserves_classification() {
        let first = EnrichmentResult::from_raw(Some("ACME"), Some("62.01Z"), Some("Software"));
        let mut record = CompanyRecord::from_enrichment(&candidate(CountryCode::Fr, "111"), &first);
        record.classification_l1 = "IT Services".to_string();

        record.apply_enrichment(CountryCode::Be, &EnrichmentResult::sentinel());

        assert_eq!(record.country, CountryCode::Be);
        assert_eq!(record.name, "N/A");
        assert_eq!(record.activity_code, "N/A");
        assert!(record.is_unknown());
        assert_eq!(record.classification_l1, "IT Services");
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let mut record = CompanyRecord::from_enrichment(
            &candidate(CountryCode::Dk, "10150825"),
            &EnrichmentResult::sentinel(),
        );
        record.name = "  ".to_string();
        assert!(record.validate().is_err());
    }
}
