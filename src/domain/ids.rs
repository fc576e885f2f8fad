//! Domain identifier types with validation
//!
//! Newtype wrappers for the two keys the pipeline works with: the supported
//! country set and the external company identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported registry countries
///
/// Parsing is case-insensitive and ignores surrounding whitespace. Any code
/// outside this set is an unsupported country.
///
/// # Examples
///
/// ```
/// use vendor_enrich::domain::ids::CountryCode;
/// use std::str::FromStr;
///
/// assert_eq!(CountryCode::from_str(" fr ").unwrap(), CountryCode::Fr);
/// assert!(CountryCode::from_str("US").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CountryCode {
    /// France
    #[serde(rename = "FR")]
    Fr,
    /// Belgium
    #[serde(rename = "BE")]
    Be,
    /// Denmark
    #[serde(rename = "DK")]
    Dk,
}

impl CountryCode {
    /// All supported countries, in run order
    pub const ALL: [CountryCode; 3] = [CountryCode::Fr, CountryCode::Be, CountryCode::Dk];

    /// ISO 3166-1 alpha-2 code
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryCode::Fr => "FR",
            CountryCode::Be => "BE",
            CountryCode::Dk => "DK",
        }
    }

    /// English display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CountryCode::Fr => "France",
            CountryCode::Be => "Belgium",
            CountryCode::Dk => "Denmark",
        }
    }

    /// Returns true if `code` names a supported country
    pub fn is_supported(code: &str) -> bool {
        Self::from_str(code).is_ok()
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CountryCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FR" => Ok(CountryCode::Fr),
            "BE" => Ok(CountryCode::Be),
            "DK" => Ok(CountryCode::Dk),
            other => Err(format!("Unsupported country: {other}")),
        }
    }
}

/// External company identifier
///
/// The format varies by country (SIREN, KBO number, CVR number) and is
/// otherwise treated as opaque. The only structural rule is that it is
/// non-empty once trimmed; [`CompanyId::new_strict`] additionally requires
/// 6 to 15 ASCII digits.
///
/// # Examples
///
/// ```
/// use vendor_enrich::domain::ids::CompanyId;
///
/// let id = CompanyId::new(" 552100554 ").unwrap();
/// assert_eq!(id.as_str(), "552100554");
/// assert!(CompanyId::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    /// Creates a new CompanyId, trimming surrounding whitespace
    pub fn new(id: impl AsRef<str>) -> Result<Self, String> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err("Company id cannot be empty".to_string());
        }
        Ok(Self(id.to_string()))
    }

    /// Creates a new CompanyId that must be 6 to 15 ASCII digits
    pub fn new_strict(id: impl AsRef<str>) -> Result<Self, String> {
        let candidate = Self::new(id)?;
        let raw = candidate.as_str();
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("Company id '{raw}' must contain only digits"));
        }
        if !(6..=15).contains(&raw.len()) {
            return Err(format!(
                "Company id '{raw}' must be between 6 and 15 digits, got {}",
                raw.len()
            ));
        }
        Ok(candidate)
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CompanyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
