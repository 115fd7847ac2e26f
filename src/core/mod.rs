//! Core business logic for Docseed.
//!
//! # Modules
//!
//! - [`import`] - Discovery, loading, batch commits and run orchestration
//! - [`transform`] - Value normalization (timestamp detection)
//!
//! # Import Workflow
//!
//! 1. **Discover**: List export files in the source directory, sorted by name
//! 2. **Load**: Parse each file's single collection and its documents
//! 3. **Normalize**: Convert timestamp strings to native timestamps
//! 4. **Commit**: Write documents as upserts in atomic batches of up to 500
//! 5. **Report**: Collect per-file outcomes into an import summary
//!
//! # Example
//!
//! ```rust,no_run
//! use docseed::adapters::store::create_store;
//! use docseed::config::load_config;
//! use docseed::core::import::{ImportCoordinator, ImportOptions};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("docseed.toml")?;
//! let store = create_store(&config)?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let options = ImportOptions::from_config(&config.import, config.application.dry_run);
//! let coordinator = ImportCoordinator::new(store, options).with_shutdown(shutdown_rx);
//!
//! let summary = coordinator
//!     .import_all(Path::new(&config.import.source_dir))
//!     .await?;
//!
//! println!("Succeeded: {}", summary.succeeded.len());
//! println!("Failed: {}", summary.failed.len());
//! # Ok(())
//! # }
//! ```

pub mod import;
pub mod transform;
