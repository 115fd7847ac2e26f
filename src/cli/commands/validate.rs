//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Docseed configuration file.

use crate::config::schema::StoreTarget;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// [`load_config`] validates as it loads, so a loaded config is valid.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {:?}", config.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Source Directory: {}", config.import.source_dir);
        println!("  Extensions: {:?}", config.import.extensions);
        println!("  Batch Size: {}", config.import.batch_size);
        println!("  Store Target: {}", config.store_target);

        if config.store_target == StoreTarget::Firestore {
            if let Some(ref firestore) = config.firestore {
                println!("  Firestore Project: {}", firestore.project_id);
                println!("  Firestore Database: {}", firestore.database_id);
                println!("  Firestore Endpoint: {}", firestore.base_url);
                let credentials = match (&firestore.access_token, &firestore.credentials_path) {
                    (Some(_), _) => "static access token".to_string(),
                    (None, Some(path)) => format!("service account ({path})"),
                    (None, None) => "none (emulator)".to_string(),
                };
                println!("  Credentials: {credentials}");
            }
        }

        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();

        Ok(0)
    }
}
