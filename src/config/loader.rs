//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DocseedConfig, StoreTarget};
use super::secret::secret_string;
use crate::domain::errors::DocseedError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DocseedConfig
/// 4. Applies environment variable overrides (DOCSEED_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`DocseedError::Configuration`] if the file is missing or unreadable,
/// a referenced environment variable is unset, the TOML is invalid, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use docseed::config::loader::load_config;
///
/// let config = load_config("docseed.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DocseedConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DocseedError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DocseedError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let config = parse_config(&contents)?;

    config.validate().map_err(|e| {
        DocseedError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Parses configuration text without validating it
///
/// Environment substitution and `DOCSEED_*` overrides are applied.
pub fn parse_config(contents: &str) -> Result<DocseedConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DocseedConfig = toml::from_str(&contents)
        .map_err(|e| DocseedError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DocseedError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        // Comment lines are copied through untouched
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
                    let placeholder = format!("${{{var_name}}}");
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
        return Err(DocseedError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using DOCSEED_* prefix
///
/// Environment variables follow the pattern: DOCSEED_<SECTION>_<KEY>
/// For example: DOCSEED_IMPORT_SOURCE_DIR, DOCSEED_FIRESTORE_PROJECT_ID
fn apply_env_overrides(config: &mut DocseedConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("DOCSEED_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("DOCSEED_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    // Import overrides
    if let Ok(val) = std::env::var("DOCSEED_IMPORT_SOURCE_DIR") {
        config.import.source_dir = val;
    }
    if let Ok(val) = std::env::var("DOCSEED_IMPORT_EXTENSIONS") {
        config.import.extensions = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("DOCSEED_IMPORT_BATCH_SIZE") {
        let size = val.parse().map_err(|_| {
            DocseedError::Configuration(format!("DOCSEED_IMPORT_BATCH_SIZE is not a number: {val}"))
        })?;
        config.import.batch_size = size;
    }

    // Store target override
    if let Ok(val) = std::env::var("DOCSEED_STORE_TARGET") {
        config.store_target = match val.to_lowercase().as_str() {
            "firestore" => StoreTarget::Firestore,
            "memory" => StoreTarget::Memory,
            other => {
                return Err(DocseedError::Configuration(format!(
                    "DOCSEED_STORE_TARGET must be 'firestore' or 'memory', got '{other}'"
                )))
            }
        };
    }

    // Firestore overrides (only if Firestore is configured)
    if let Some(ref mut firestore) = config.firestore {
        if let Ok(val) = std::env::var("DOCSEED_FIRESTORE_PROJECT_ID") {
            firestore.project_id = val;
        }
        if let Ok(val) = std::env::var("DOCSEED_FIRESTORE_DATABASE_ID") {
            firestore.database_id = val;
        }
        if let Ok(val) = std::env::var("DOCSEED_FIRESTORE_BASE_URL") {
            firestore.base_url = val;
        }
        if let Ok(val) = std::env::var("DOCSEED_FIRESTORE_ACCESS_TOKEN") {
            firestore.access_token = Some(secret_string(val));
        }
        if let Ok(val) = std::env::var("DOCSEED_FIRESTORE_CREDENTIALS_PATH") {
            firestore.credentials_path = Some(val);
        }
        if let Ok(val) = std::env::var("DOCSEED_FIRESTORE_TIMEOUT_SECONDS") {
            if let Ok(timeout) = val.parse() {
                firestore.timeout_seconds = timeout;
            }
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("DOCSEED_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("DOCSEED_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
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
        std::env::set_var("DOCSEED_LOADER_TEST_VAR", "test_value");
        let input = "access_token = \"${DOCSEED_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "access_token = \"test_value\"\n");
        std::env::remove_var("DOCSEED_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("DOCSEED_LOADER_MISSING_VAR");
        let input = "access_token = \"${DOCSEED_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("DOCSEED_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("DOCSEED_LOADER_COMMENTED_VAR");
        let input = "# token = \"${DOCSEED_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(DocseedError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
store_target = "firestore"

[application]
log_level = "debug"

[import]
source_dir = "./seed"
batch_size = 250

[firestore]
project_id = "learning-app"
base_url = "http://localhost:8080/v1"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.import.source_dir, "./seed");
        assert_eq!(config.import.batch_size, 250);
        assert_eq!(config.import.extensions, vec!["json".to_string()]);

        let firestore = config.firestore.unwrap();
        assert_eq!(firestore.project_id, "learning-app");
        assert_eq!(firestore.database_id, "(default)");
        assert!(firestore.access_token.is_none());
    }

    #[test]
    fn test_load_config_invalid_values() {
        let toml_content = r#"
store_target = "memory"

[import]
batch_size = 1000
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }
}
