//! Configuration management for Docseed.
//!
//! Docseed reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DOCSEED_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation before any import work starts
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run flag
//! - [`ImportConfig`] - Source directory, export extensions, batch size
//! - [`FirestoreConfig`] - Project, database, endpoint and credentials
//! - [`LoggingConfig`] - Optional rotating file logs
//!
//! # Example Configuration
//!
//! ```toml
//! store_target = "firestore"
//!
//! [application]
//! log_level = "info"
//!
//! [import]
//! source_dir = "./firestore_data"
//! batch_size = 500
//!
//! [firestore]
//! project_id = "learning-app"
//! access_token = "${DOCSEED_FIRESTORE_TOKEN}"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use docseed::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("docseed.toml")?;
//! println!("Importing from {}", config.import.source_dir);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DocseedConfig, Environment, FirestoreConfig, ImportConfig, LoggingConfig,
    StoreTarget,
};
pub use secret::{secret_string, SecretString, SecretValue};
