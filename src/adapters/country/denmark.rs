//! Denmark: Central Business Register (CVR) company page

use super::http::{element_text, selector, HttpSource};
use super::CountryAdapter;
use crate::domain::errors::SourceError;
use crate::domain::{CompanyId, CountryCode, EnrichmentResult};
use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

const ACTIVITY_LABEL: &str = "Branchekode";

fn code_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\s+(.+)$").expect("code pattern is valid"))
}

/// Adapter for the Danish CVR register
#[derive(Debug, Clone)]
pub struct DenmarkAdapter {
    source: HttpSource,
}

impl DenmarkAdapter {
    /// Create a new adapter over `source`
    pub fn new(source: HttpSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CountryAdapter for DenmarkAdapter {
    fn country(&self) -> CountryCode {
        CountryCode::Dk
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

/// Extract name and activity from a company page
pub(crate) fn extract(html: &str) -> Result<EnrichmentResult, SourceError> {
    let document = Html::parse_document(html);
    let name_sel = selector("h1.h2")?;
    let label_sel = selector("strong")?;

    let name = document.select(&name_sel).next().map(element_text);

    let activity = document
        .select(&label_sel)
        .find(|strong| element_text(*strong).contains(ACTIVITY_LABEL))
        .and_then(value_after_label)
        .or_else(|| scan_text(&document));

    let (code, description) = match activity {
        Some((code, description)) => (Some(code), description),
        None => (None, None),
    };

    Ok(EnrichmentResult::from_raw(
        name.as_deref(),
        code.as_deref(),
        description.as_deref(),
    ))
}

/// `<code> <description>` from the element following the label's container
fn value_after_label(label: ElementRef<'_>) -> Option<(String, Option<String>)> {
    let container = label.parent()?;
    let value = container.next_siblings().find_map(ElementRef::wrap)?;
    let text = element_text(value);
    if text.is_empty() {
        return None;
    }
    Some(match text.split_once(' ') {
        Some((code, description)) => (code.to_string(), Some(description.to_string())),
        None => (text, None),
    })
}

/// Fallback: scan text fragments for the label followed by a numeric code
fn scan_text(document: &Html) -> Option<(String, Option<String>)> {
    let fragments: Vec<&str> = document
        .root_element()
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    fragments.iter().enumerate().find_map(|(i, fragment)| {
        let (_, rest) = fragment.split_once(ACTIVITY_LABEL)?;
        let rest = rest.trim_start_matches(':').trim();
        let candidate = if rest.is_empty() {
            fragments.get(i + 1).copied()?
        } else {
            rest
        };
        let caps = code_pattern().captures(candidate)?;
        Some((caps[1].to_string(), Some(caps[2].to_string())))
    })
}
