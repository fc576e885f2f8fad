//! Country code to adapter resolution

use super::{BelgiumAdapter, CountryAdapter, DenmarkAdapter, FranceAdapter, HttpSource};
use crate::config::SourcesConfig;
use crate::domain::{CountryCode, EnrichError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Registry of country adapters
///
/// Resolution is a map lookup; an unregistered country fails fast.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<CountryCode, Arc<dyn CountryAdapter>>,
}

impl AdapterRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the HTTP adapter of every supported country
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_sources(sources: &SourcesConfig, timeout: Duration) -> Result<Self> {
        let ua = sources.user_agent.as_str();
        let mut registry = Self::new();
        registry.register(Arc::new(FranceAdapter::new(HttpSource::new(
            &sources.fr_api_url,
            timeout,
            ua,
        )?)));
        registry.register(Arc::new(BelgiumAdapter::new(HttpSource::new(
            &sources.be_search_url,
            timeout,
            ua,
        )?)));
        registry.register(Arc::new(DenmarkAdapter::new(HttpSource::new(
            &sources.dk_company_url,
            timeout,
            ua,
        )?)));
        Ok(registry)
    }

    /// Register an adapter under its own country, replacing any previous one
    pub fn register(&mut self, adapter: Arc<dyn CountryAdapter>) -> &mut Self {
        self.adapters.insert(adapter.country(), adapter);
        self
    }

    /// Resolve the adapter for `country`
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Validation`] if no adapter is registered.
    pub fn get(&self, country: CountryCode) -> Result<Arc<dyn CountryAdapter>> {
        self.adapters
            .get(&country)
            .cloned()
            .ok_or_else(|| EnrichError::Validation(format!("Unsupported country: {country}")))
    }

    /// Resolve the adapter for a raw country code
    pub fn resolve(&self, code: &str) -> Result<Arc<dyn CountryAdapter>> {
        let country: CountryCode = code.parse().map_err(EnrichError::Validation)?;
        self.get(country)
    }

    /// Registered countries, sorted
    pub fn countries(&self) -> Vec<CountryCode> {
        let mut countries: Vec<_> = self.adapters.keys().copied().collect();
        countries.sort();
        countries
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("countries", &self.countries())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_sources_registers_all_countries() {
        let registry =
            AdapterRegistry::from_sources(&SourcesConfig::default(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(registry.countries(), CountryCode::ALL.to_vec());
        assert_eq!(registry.get(CountryCode::Dk).unwrap().country(), CountryCode::Dk);
    }

    #[test]
    fn test_resolve_unsupported_country_fails_fast() {
        let registry =
            AdapterRegistry::from_sources(&SourcesConfig::default(), Duration::from_secs(5))
                .unwrap();
        assert!(matches!(registry.resolve("US"), Err(EnrichError::Validation(_))));
        assert!(registry.resolve(" be ").is_ok());
    }

    #[test]
    fn test_empty_registry() {
        let registry = AdapterRegistry::new();
        assert!(registry.get(CountryCode::Fr).is_err());
        assert!(registry.countries().is_empty());
    }
}
