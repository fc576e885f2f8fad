// vendor-enrich - Vendor identity enrichment from public company registries
// Copyright (c) 2025 vendor-enrich Contributors
// Licensed under the MIT License

//! # vendor-enrich
//!
//! vendor-enrich takes a list of vendor identities (country code plus
//! national company id), looks up the companies it has not seen before in
//! the French, Belgian and Danish public registries, and upserts name and
//! activity classification into a company dataset without touching the
//! curated L1-L3 classification columns.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Reconciliation, fetch engine, merge and run coordination
//! - [`adapters`] - Country registries, vendor list input, company stores
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vendor_enrich::adapters::input::read_identities;
//! use vendor_enrich::adapters::store::CsvCompanyStore;
//! use vendor_enrich::config::load_config;
//! use vendor_enrich::core::enrich::EnrichmentCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("vendor-enrich.toml")?;
//!     let vendors = read_identities("vendors.csv", "country", "company_id")?;
//!     let mut store = CsvCompanyStore::open(&config.store.path)?;
//!
//!     let coordinator = EnrichmentCoordinator::from_config(&config)?;
//!     let report = coordinator.run(&vendors.identities, &mut store).await?;
//!
//!     println!("Added {} companies", report.added);
//!     Ok(())
//! }
//! ```
//!
//! ## Custom adapters
//!
//! Any lookup source can be plugged in through
//! [`CountryAdapter`](adapters::country::CountryAdapter):
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use vendor_enrich::adapters::country::{AdapterRegistry, CountryAdapter};
//! use vendor_enrich::domain::errors::SourceError;
//! use vendor_enrich::domain::{CompanyId, CountryCode, EnrichmentResult};
//!
//! struct Fixed;
//!
//! #[async_trait]
//! impl CountryAdapter for Fixed {
//!     fn country(&self) -> CountryCode {
//!         CountryCode::Fr
//!     }
//!
//!     async fn lookup(&self, _id: &CompanyId) -> Result<EnrichmentResult, SourceError> {
//!         Ok(EnrichmentResult::from_raw(Some("ACME"), Some("62.01Z"), None))
//!     }
//! }
//!
//! let mut registry = AdapterRegistry::new();
//! registry.register(Arc::new(Fixed));
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`] with [`domain::EnrichError`].
//! A run reports partial failures in its
//! [`RunReport`](core::enrich::RunReport) instead of failing.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
