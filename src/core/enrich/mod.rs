//! Enrichment orchestration
//!
//! This module provides the entry point of the pipeline:
//! - Run coordination across country groups
//! - Run reporting

pub mod coordinator;
pub mod report;

pub use coordinator::{EnrichmentCoordinator, RunOptions};
pub use report::{CountryReport, PersistenceStatus, RunReport};
