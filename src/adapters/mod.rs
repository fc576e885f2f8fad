//! External system integrations.
//!
//! - [`country`] - Per-country company registries (France, Belgium, Denmark)
//! - [`store`] - Company dataset abstraction with CSV and in-memory backends
//! - [`input`] - Vendor list reader
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the pipeline can
//! be exercised with scripted implementations:
//!
//! ```rust,no_run
//! use vendor_enrich::adapters::country::AdapterRegistry;
//! use vendor_enrich::adapters::store::{CompanyStore, CsvCompanyStore};
//! use vendor_enrich::config::SourcesConfig;
//! use std::time::Duration;
//!
//! # fn example() -> vendor_enrich::domain::Result<()> {
//! let registry = AdapterRegistry::from_sources(&SourcesConfig::default(), Duration::from_secs(30))?;
//! let store = CsvCompanyStore::open("data/companies.csv")?;
//! println!("{} adapters, {} companies", registry.countries().len(), store.len());
//! # Ok(())
//! # }
//! ```

pub mod country;
pub mod input;
pub mod store;
