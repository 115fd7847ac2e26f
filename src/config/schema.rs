//! Configuration schema types
//!
//! This module defines the configuration structure that maps to `docseed.toml`.

use crate::config::SecretString;
use crate::domain::MAX_BATCH_WRITES;
use serde::{Deserialize, Serialize};

/// Store target selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreTarget {
    /// Cloud Firestore (or the Firestore emulator)
    Firestore,
    /// In-process store, discarded at exit
    Memory,
}

impl std::fmt::Display for StoreTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreTarget::Firestore => write!(f, "firestore"),
            StoreTarget::Memory => write!(f, "memory"),
        }
    }
}

/// Runtime environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Staging environment
    Staging,
    /// Production environment
    Production,
}

/// Main Docseed configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocseedConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Runtime environment (development, staging, production)
    #[serde(default)]
    pub environment: Environment,

    /// Import settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Store target (firestore or memory)
    pub store_target: StoreTarget,

    /// Firestore configuration (required if store_target = firestore)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firestore: Option<FirestoreConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DocseedConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.import.validate()?;

        // Both sections may be present; only the active target is validated
        match self.store_target {
            StoreTarget::Firestore => match self.firestore {
                Some(ref config) => config.validate(&self.environment)?,
                None => {
                    return Err(
                        "firestore configuration is required when store_target = 'firestore'"
                            .to_string(),
                    )
                }
            },
            StoreTarget::Memory => {
                if self.environment == Environment::Production {
                    return Err(
                        "store_target = 'memory' is not allowed in production".to_string()
                    );
                }
            }
        }

        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (load and batch, but never commit)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Import configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Directory holding the export files
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// File extensions treated as export files (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Writes per commit (1-500)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            extensions: default_extensions(),
            batch_size: default_batch_size(),
        }
    }
}

impl ImportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.source_dir.trim().is_empty() {
            return Err("import.source_dir cannot be empty".to_string());
        }

        if self.extensions.is_empty() {
            return Err("import.extensions must list at least one extension".to_string());
        }

        if let Some(ext) = self
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.'))
        {
            return Err(format!(
                "import.extensions entries must be non-empty and given without a leading dot, got '{ext}'"
            ));
        }

        if self.batch_size == 0 || self.batch_size > MAX_BATCH_WRITES {
            return Err(format!(
                "import.batch_size must be between 1 and {MAX_BATCH_WRITES}, got {}",
                self.batch_size
            ));
        }

        Ok(())
    }
}

/// Firestore configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project id
    pub project_id: String,

    /// Database id within the project
    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// REST API root, e.g. `http://localhost:8080/v1` for the emulator
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth2 access token sent as a bearer token
    /// Stored securely in memory and automatically zeroized on drop.
    /// Leave unset when targeting the emulator.
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Path to a service-account JSON key
    /// Access tokens are minted from the key and refreshed before they expire.
    /// Mutually exclusive with `access_token`.
    #[serde(default)]
    pub credentials_path: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl FirestoreConfig {
    fn validate(&self, environment: &Environment) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.project_id.trim().is_empty() {
            return Err("firestore.project_id cannot be empty".to_string());
        }

        if self.database_id.trim().is_empty() {
            return Err("firestore.database_id cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("firestore.base_url must start with http:// or https://".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("firestore.timeout_seconds must be > 0".to_string());
        }

        let has_token = self
            .access_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().is_empty());

        if let Some(ref path) = self.credentials_path {
            if path.trim().is_empty() {
                return Err("firestore.credentials_path cannot be empty".to_string());
            }
            if has_token {
                return Err(
                    "firestore.access_token and firestore.credentials_path are mutually exclusive"
                        .to_string(),
                );
            }
        }

        if *environment == Environment::Production {
            if !self.base_url.starts_with("https://") {
                return Err("firestore.base_url must use https:// in production".to_string());
            }
            if !has_token && self.credentials_path.is_none() {
                return Err(
                    "firestore.access_token or firestore.credentials_path is required in production"
                        .to_string(),
                );
            }
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_source_dir() -> String {
    "./firestore_data".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["json".to_string()]
}

fn default_batch_size() -> usize {
    MAX_BATCH_WRITES
}

fn default_database_id() -> String {
    "(default)".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
