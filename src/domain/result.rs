//! Result type alias
//!
//! Convenience alias that uses [`EnrichError`] as the error type.

use super::errors::EnrichError;

/// Result type alias for crate operations
///
/// # Examples
///
/// ```
/// use vendor_enrich::domain::result::Result;
/// use vendor_enrich::domain::errors::EnrichError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(EnrichError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, EnrichError>;
