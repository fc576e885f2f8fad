//! Belgium: Crossroads Bank for Enterprises public search
//!
//! The registry serves an HTML page per enterprise number. The name sits in
//! the table row labelled `Name:`. Activities are listed in `QL` cells; the
//! current NSSO 2025 nomenclature is preferred and VAT 2008 is the fallback.

use super::http::{element_text, selector, HttpSource};
use super::CountryAdapter;
use crate::domain::errors::SourceError;
use crate::domain::{CompanyId, CountryCode, EnrichmentResult};
use async_trait::async_trait;
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

fn activity_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"NSSO2025\s+([\d.]+)\s*-\s*(.*?)(?:\s+Since|$)")
                .expect("NSSO pattern is valid"),
            Regex::new(r"VAT\s?2008\s+([\d.]+)\s*-\s*(.*?)(?:\s+Since|$)")
                .expect("VAT pattern is valid"),
        ]
    })
}

/// Adapter for the Belgian enterprise registry
#[derive(Debug, Clone)]
pub struct BelgiumAdapter {
    source: HttpSource,
}

impl BelgiumAdapter {
    /// Create a new adapter over `source`
    pub fn new(source: HttpSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CountryAdapter for BelgiumAdapter {
    fn country(&self) -> CountryCode {
        CountryCode::Be
    }

    async fn lookup(&self, id: &CompanyId) -> Result<EnrichmentResult, SourceError> {
        let body = self.source.get_text(id.as_str()).await?;
        let result = extract(&body)?;
        if result.is_sentinel() {
            return Err(SourceError::NotFound(id.to_string()));
        }
        Ok(result)
    }
}

/// Extract name and activity from a registry page
pub(crate) fn extract(html: &str) -> Result<EnrichmentResult, SourceError> {
    let document = Html::parse_document(html);
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;
    let activity_sel = selector("td.QL")?;

    let name = document.select(&row_sel).find_map(|row| {
        let mut cells = row.select(&cell_sel);
        let label = cells.next()?;
        if !element_text(label).contains("Name:") {
            return None;
        }
        let value = cells.next()?;
        value
            .text()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    });

    let activity_cells: Vec<String> = document.select(&activity_sel).map(element_text).collect();

    // Patterns in priority order; the fallback only runs if the primary never matches
    let activity = activity_patterns().iter().find_map(|pattern| {
        activity_cells.iter().find_map(|text| {
            pattern
                .captures(text)
                .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        })
    });

    let (code, description) = match activity {
        Some((code, description)) => (Some(code), Some(description)),
        None => (None, None),
    };

    Ok(EnrichmentResult::from_raw(
        name.as_deref(),
        code.as_deref(),
        description.as_deref(),
    ))
}
