//! Import command implementation
//!
//! This module implements the `import` command, which loads every export
//! file in the source directory into the configured store.

use crate::adapters::store::create_store;
use crate::config::load_config;
use crate::core::import::{ImportCoordinator, ImportOptions, ImportSummary};
use crate::domain::DocseedError;
use clap::Args;
use std::path::Path;
use tokio::sync::watch;

/// Every file imported
pub const EXIT_SUCCESS: i32 = 0;
/// At least one file failed
pub const EXIT_PARTIAL_FAILURE: i32 = 1;
/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Source directory could not be listed
pub const EXIT_DISCOVERY_ERROR: i32 = 3;
/// Store client could not be created
pub const EXIT_STORE_ERROR: i32 = 4;
/// Unexpected failure
pub const EXIT_FATAL: i32 = 5;
/// Stopped by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Arguments for the import command
#[derive(Args, Debug, Default)]
pub struct ImportArgs {
    /// Directory holding the export files (overrides import.source_dir)
    #[arg(short, long)]
    pub source_dir: Option<String>,

    /// Dry run mode - load and batch documents without writing to the store
    #[arg(long)]
    pub dry_run: bool,

    /// Writes per batch, 1-500 (overrides import.batch_size)
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting import command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        // Apply CLI overrides
        if let Some(source_dir) = &self.source_dir {
            tracing::info!(source_dir = %source_dir, "Overriding source directory from CLI");
            config.import.source_dir = source_dir.clone();
        }
        if let Some(batch_size) = self.batch_size {
            tracing::info!(batch_size, "Overriding batch size from CLI");
            config.import.batch_size = batch_size;
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let dry_run = config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to the store");
            println!();
        }

        let store = match create_store(&config) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create document store");
                eprintln!("Failed to initialize store: {e}");
                return Ok(EXIT_STORE_ERROR);
            }
        };

        let options = ImportOptions::from_config(&config.import, dry_run);
        let coordinator = ImportCoordinator::new(store, options).with_shutdown(shutdown_signal);

        println!("🚀 Importing from {}", config.import.source_dir);
        println!();

        let summary = match coordinator
            .import_all(Path::new(&config.import.source_dir))
            .await
        {
            Ok(s) => s,
            Err(e @ DocseedError::Discovery(_)) => {
                tracing::error!(error = %e, "Failed to discover export files");
                eprintln!("{e}");
                return Ok(EXIT_DISCOVERY_ERROR);
            }
            Err(e) => {
                tracing::error!(error = %e, "Import failed");
                eprintln!("Import failed: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        print_summary(&summary);

        let exit_code = exit_code(&summary);
        match exit_code {
            EXIT_INTERRUPTED => {
                println!("⚠️  Import interrupted. Re-run the same command to finish;");
                println!("   documents already written are overwritten with the same content.");
            }
            EXIT_PARTIAL_FAILURE => println!("⚠️  Import completed with failures"),
            _ => println!("✅ Import completed successfully!"),
        }

        Ok(exit_code)
    }
}

/// Map a summary to the process exit status
pub fn exit_code(summary: &ImportSummary) -> i32 {
    if summary.interrupted {
        EXIT_INTERRUPTED
    } else if !summary.failed.is_empty() {
        EXIT_PARTIAL_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

fn print_summary(summary: &ImportSummary) {
    println!();
    println!("📊 Import Summary:");
    println!("  Files Processed: {}", summary.files_processed());
    println!("  Succeeded: {}", summary.succeeded.len());
    println!("  Failed: {}", summary.failed.len());
    if !summary.skipped.is_empty() {
        println!("  Skipped: {}", summary.skipped.len());
    }
    println!("  Documents: {}", summary.total_documents());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    for import in &summary.succeeded {
        println!(
            "  ✔ {} → {} ({} documents, {} batches)",
            import.file_name, import.collection, import.documents_committed, import.batches
        );
    }

    if !summary.failed.is_empty() {
        println!();
        println!("⚠️  Failures:");
        for failure in &summary.failed {
            println!("  ✘ {} [{}]: {}", failure.file_name, failure.kind, failure.message);
            if failure.committed > 0 {
                println!(
                    "    {} document(s) of '{}' were committed before the failure",
                    failure.committed,
                    failure.collection.as_deref().unwrap_or("?")
                );
            }
        }
    }
    println!();
}
