//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::EnrichConfig;
use crate::domain::errors::EnrichError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into EnrichConfig
/// 4. Applies environment variable overrides (VENDOR_ENRICH_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use vendor_enrich::config::loader::load_config;
///
/// let config = load_config("vendor-enrich.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EnrichConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EnrichError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        EnrichError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn load_config_from_str(contents: &str) -> Result<EnrichConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: EnrichConfig = toml::from_str(&contents)
        .map_err(|e| EnrichError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        EnrichError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are passed through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = placeholder_regex();
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(EnrichError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(val) => val.trim().parse().map(Some).map_err(|_| {
            EnrichError::Configuration(format!("Invalid value '{}' for {}", val, key))
        }),
        Err(_) => Ok(None),
    }
}

/// Applies environment variable overrides using the VENDOR_ENRICH_* prefix
///
/// Environment variables follow the pattern: VENDOR_ENRICH_<SECTION>_<KEY>
/// For example: VENDOR_ENRICH_ENRICHMENT_CONCURRENCY, VENDOR_ENRICH_STORE_PATH
fn apply_env_overrides(config: &mut EnrichConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("VENDOR_ENRICH_APPLICATION_LOG_LEVEL")? {
        config.application.log_level = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_APPLICATION_DRY_RUN")? {
        config.application.dry_run = val;
    }

    // Enrichment overrides
    if let Some(val) = env_override("VENDOR_ENRICH_ENRICHMENT_BATCH_SIZE")? {
        config.enrichment.batch_size = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_ENRICHMENT_CONCURRENCY")? {
        config.enrichment.concurrency = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_ENRICHMENT_INTER_BATCH_DELAY_MS")? {
        config.enrichment.inter_batch_delay_ms = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_ENRICHMENT_PER_FETCH_TIMEOUT_SECS")? {
        config.enrichment.per_fetch_timeout_secs = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_ENRICHMENT_MAX_CONSECUTIVE_FAILURES")? {
        config.enrichment.max_consecutive_failures = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_ENRICHMENT_REFRESH_EXISTING")? {
        config.enrichment.refresh_existing = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_ENRICHMENT_STRICT_ID_VALIDATION")? {
        config.enrichment.strict_id_validation = val;
    }

    // Source overrides
    if let Some(val) = env_override("VENDOR_ENRICH_SOURCES_FR_API_URL")? {
        config.sources.fr_api_url = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_SOURCES_BE_SEARCH_URL")? {
        config.sources.be_search_url = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_SOURCES_DK_COMPANY_URL")? {
        config.sources.dk_company_url = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_SOURCES_USER_AGENT")? {
        config.sources.user_agent = val;
    }

    // Store and input overrides
    if let Some(val) = env_override("VENDOR_ENRICH_STORE_PATH")? {
        config.store.path = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_INPUT_COUNTRY_COLUMN")? {
        config.input.country_column = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_INPUT_ID_COLUMN")? {
        config.input.id_column = val;
    }

    // Logging overrides
    if let Some(val) = env_override("VENDOR_ENRICH_LOGGING_LOCAL_ENABLED")? {
        config.logging.local_enabled = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_LOGGING_LOCAL_PATH")? {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("VENDOR_ENRICH_LOGGING_LOCAL_ROTATION")? {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("VE_LOADER_TEST_VAR", "test_value");
        let input = "path = \"${VE_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"test_value\"\n");
        std::env::remove_var("VE_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("VE_LOADER_MISSING_VAR");
        let input = "path = \"${VE_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("VE_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("VE_LOADER_COMMENTED_VAR");
        let input = "# path = \"${VE_LOADER_COMMENTED_VAR}\"\nkey = 1";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[enrichment]
batch_size = 50
concurrency = 4
max_consecutive_failures = 3

[store]
path = "companies.csv"

[input]
country_column = "Vendor Country"
id_column = "SIREN"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.enrichment.batch_size, 50);
        assert_eq!(config.enrichment.concurrency, 4);
        assert_eq!(config.enrichment.max_consecutive_failures, 3);
        assert_eq!(config.enrichment.per_fetch_timeout_secs, 30);
        assert_eq!(config.input.id_column, "SIREN");
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let result = load_config_from_str("[enrichment]\nconcurrency = 0\n");
        assert!(matches!(result, Err(EnrichError::Configuration(_))));
    }
}
