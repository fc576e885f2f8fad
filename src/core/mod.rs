//! Core business logic for vendor-enrich.
//!
//! # Modules
//!
//! - [`reconcile`] - Partition vendor identities into known and new ids
//! - [`fetch`] - Batched, concurrency-bounded lookups with a circuit breaker
//! - [`merge`] - Upsert fetched results, preserving curated classification
//! - [`metrics`] - Per-country counters and snapshots
//! - [`progress`] - Progress event sinks
//! - [`enrich`] - Run coordination and reporting
//!
//! # Enrichment Workflow
//!
//! 1. **Reconcile**: drop malformed, duplicate and unsupported identities;
//!    split the rest into ids the store knows and ids it does not
//! 2. **Fetch**: per country, in batches, through the country's adapter
//! 3. **Merge**: upsert each country's results into the store
//! 4. **Persist**: write the store once
//! 5. **Report**: return a [`RunReport`](enrich::RunReport)
//!
//! # Example
//!
//! ```rust,no_run
//! use vendor_enrich::adapters::store::CsvCompanyStore;
//! use vendor_enrich::config::load_config;
//! use vendor_enrich::core::enrich::EnrichmentCoordinator;
//! use vendor_enrich::domain::VendorIdentity;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("vendor-enrich.toml")?;
//! let mut store = CsvCompanyStore::open(&config.store.path)?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = EnrichmentCoordinator::from_config(&config)?.with_shutdown(shutdown_rx);
//!
//! let identities = vec![VendorIdentity::new("FR", "552100554")];
//! let report = coordinator.run(&identities, &mut store).await?;
//!
//! println!("Added: {}", report.added);
//! println!("Updated: {}", report.updated);
//! println!("Errors: {}", report.errors);
//! # Ok(())
//! # }
//! ```

pub mod enrich;
pub mod fetch;
pub mod merge;
pub mod metrics;
pub mod progress;
pub mod reconcile;
