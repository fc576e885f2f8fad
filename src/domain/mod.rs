//! Domain models and types.
//!
//! This module contains the core domain types shared by every layer.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CountryCode`], [`CompanyId`])
//! - **Domain models** ([`VendorIdentity`], [`Candidate`], [`EnrichmentResult`], [`CompanyRecord`])
//! - **Error types** ([`EnrichError`], [`SourceError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Sentinel Results
//!
//! A failed or empty registry lookup is not an error value. It is an
//! [`EnrichmentResult`] whose fields are all `None`, written to the store as
//! `N/A`:
//!
//! ```rust
//! use vendor_enrich::domain::EnrichmentResult;
//!
//! let unknown = EnrichmentResult::sentinel();
//! assert!(unknown.is_sentinel());
//! assert_eq!(unknown.name_or_sentinel(), "N/A");
//! ```

pub mod company;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use company::{Candidate, CompanyRecord, EnrichmentResult, VendorIdentity, SENTINEL};
pub use errors::{EnrichError, SourceError, StoreError};
pub use ids::{CompanyId, CountryCode};
pub use result::Result;
