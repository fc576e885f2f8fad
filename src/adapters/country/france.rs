//! France: company search index (recherche-entreprises)
//!
//! The index answers a SIREN query with structured JSON; the first entry of
//! `results` is taken.

use super::http::HttpSource;
use super::CountryAdapter;
use crate::domain::errors::SourceError;
use crate::domain::{CompanyId, CountryCode, EnrichmentResult};
use async_trait::async_trait;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    nom_complet: Option<String>,
    activite_principale: Option<String>,
    libelle_activite_principale: Option<String>,
}

/// Adapter for the French company search API
#[derive(Debug, Clone)]
pub struct FranceAdapter {
    source: HttpSource,
}

impl FranceAdapter {
    /// Create a new adapter over `source`
    pub fn new(source: HttpSource) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CountryAdapter for FranceAdapter {
    fn country(&self) -> CountryCode {
        CountryCode::Fr
    }

    async fn lookup(&self, id: &CompanyId) -> Result<EnrichmentResult, SourceError> {
        let response: SearchResponse = self.source.get_json(id.as_str()).await?;

        let entry = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))?;

        tracing::debug!(id = %id, name = ?entry.nom_complet, "French registry hit");

        Ok(EnrichmentResult::from_raw(
            entry.nom_complet.as_deref(),
            entry.activite_principale.as_deref(),
            entry.libelle_activite_principale.as_deref(),
        ))
    }
}
