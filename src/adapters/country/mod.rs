//! Country registry adapters
//!
//! One [`CountryAdapter`] per supported country, resolved through the
//! [`AdapterRegistry`]. Every adapter exposes a fallible `lookup` and an
//! infallible `fetch`: the latter is the single point where transport,
//! status, parse and not-found failures collapse into a sentinel result.

pub mod belgium;
pub mod denmark;
pub mod france;
pub mod http;
pub mod registry;

pub use belgium::BelgiumAdapter;
pub use denmark::DenmarkAdapter;
pub use france::FranceAdapter;
pub use http::HttpSource;
pub use registry::AdapterRegistry;

use crate::domain::errors::SourceError;
use crate::domain::{CompanyId, CountryCode, EnrichmentResult};
use async_trait::async_trait;

/// Trait for country registry implementations
///
/// # Example
///
/// ```no_run
/// use vendor_enrich::adapters::country::{CountryAdapter, FranceAdapter, HttpSource};
/// use vendor_enrich::domain::CompanyId;
/// use std::time::Duration;
///
/// # async fn example() -> vendor_enrich::domain::Result<()> {
/// let source = HttpSource::new(
///     "https://recherche-entreprises.api.gouv.fr/search?q={id}",
///     Duration::from_secs(30),
///     "vendor-enrich",
/// )?;
/// let adapter = FranceAdapter::new(source);
///
/// let result = adapter.fetch(&CompanyId::new("552100554").unwrap()).await;
/// println!("{}", result.name_or_sentinel());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait CountryAdapter: Send + Sync {
    /// Country this adapter serves
    fn country(&self) -> CountryCode;

    /// Query the registry for `id`
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] for any transport, status or decoding
    /// failure, or when the registry has no entry for the id.
    async fn lookup(&self, id: &CompanyId) -> Result<EnrichmentResult, SourceError>;

    /// Query the registry for `id`, degrading any failure to a sentinel
    async fn fetch(&self, id: &CompanyId) -> EnrichmentResult {
        match self.lookup(id).await {
            Ok(result) => result,
            Err(e) => {
                crate::log_fetch_failure!(self.country(), id, e);
                EnrichmentResult::sentinel()
            }
        }
    }
}
