//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "docseed.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Docseed configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set firestore.project_id in {}", self.output);
                println!("  2. Put an OAuth access token in DOCSEED_FIRESTORE_ACCESS_TOKEN,");
                println!("     or point firestore.base_url at the emulator");
                println!("  3. Validate configuration: docseed validate-config");
                println!("  4. Try a dry run: docseed import --dry-run");
                println!("  5. Run the import: docseed import");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Docseed Configuration File
# JSON collection exports to Cloud Firestore

store_target = "firestore"  # firestore | memory

[application]
log_level = "info"
dry_run = false

[import]
source_dir = "./firestore_data"
extensions = ["json"]
batch_size = 500

[firestore]
project_id = "your-project-id"
database_id = "(default)"
# credentials_path = "./service-account-key.json"
timeout_seconds = 60

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Docseed Configuration File
# JSON collection exports to Cloud Firestore
#
# Every key can be overridden with an environment variable named
# DOCSEED_<SECTION>_<KEY>, for example DOCSEED_IMPORT_SOURCE_DIR.
# Values may reference environment variables as ${VAR_NAME}.

# ============================================================================
# Store Target
# ============================================================================
# firestore: write to Cloud Firestore or the Firestore emulator
# memory: keep documents in process memory (checks exports end to end
#         without credentials; not allowed in production)
store_target = "firestore"

# Runtime environment: development | staging | production
# Production requires https and an access token.
environment = "development"

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Load and batch every file without writing anything
dry_run = false

# ============================================================================
# Import Settings
# ============================================================================
[import]
# Directory holding the export files, one collection per file:
#   {"__collection__": {"<name>": {"__doc__": {"<id>": {...}}}}}
source_dir = "./firestore_data"

# File extensions treated as export files (without the dot)
extensions = ["json"]

# Writes per atomic commit (1-500; Firestore's limit is 500)
batch_size = 500

# ============================================================================
# Firestore
# ============================================================================
[firestore]
# Google Cloud project id
project_id = "your-project-id"

# Database id, "(default)" unless you created a named database
database_id = "(default)"

# REST endpoint. For the emulator use:
#   base_url = "http://localhost:8080/v1"
base_url = "https://firestore.googleapis.com/v1"

# Service-account JSON key. Access tokens are minted from it and refreshed
# for the length of the import.
# credentials_path = "./service-account-key.json"

# Or a short-lived OAuth 2.0 access token, e.g. from
# `gcloud auth print-access-token`. Use one or the other.
# access_token = "${DOCSEED_FIRESTORE_TOKEN}"

# Per-request timeout in seconds
timeout_seconds = 60

# ============================================================================
# Logging
# ============================================================================
[logging]
# Write JSON logs to rotating files in addition to the console
local_enabled = false
local_path = "./logs"

# Rotation: daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_generate_minimal_config() {
        let config = parse_config(&InitArgs::generate_minimal_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.import.batch_size, 500);
        assert_eq!(config.firestore.unwrap().project_id, "your-project-id");
    }

    #[test]
    fn test_generate_config_with_examples() {
        let config = parse_config(&InitArgs::generate_config_with_examples()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.import.source_dir, "./firestore_data");
    }

    #[tokio::test]
    async fn test_init_writes_file_and_respects_force() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("docseed.toml");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(output.exists());

        // Second run without --force refuses to overwrite
        assert_eq!(args.execute().await.unwrap(), 2);

        let forced = InitArgs {
            force: true,
            with_examples: true,
            ..args
        };
        assert_eq!(forced.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("Import Settings"));
    }
}
