// Docseed - JSON Collection Export Importer for Cloud Firestore
// Copyright (c) 2025 Docseed Contributors
// Licensed under the MIT License

//! # Docseed - JSON collection exports into Cloud Firestore
//!
//! Docseed bulk-loads JSON collection exports into a Firestore database.
//! Each export file holds one collection; every document is written as a
//! full-document upsert in atomic batches of up to 500 writes.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Discovering** export files in a source directory
//! - **Loading** the single collection each file holds
//! - **Normalizing** ISO-8601 millisecond timestamps into native timestamps
//! - **Committing** documents in bounded atomic batches, isolating failures per file
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (import pipeline, value normalization)
//! - [`adapters`] - External integrations (Firestore, in-memory store)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docseed::adapters::store::create_store;
//! use docseed::config::load_config;
//! use docseed::core::import::{ImportCoordinator, ImportOptions};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("docseed.toml")?;
//!     let store = create_store(&config)?;
//!
//!     let options = ImportOptions::from_config(&config.import, false);
//!     let coordinator = ImportCoordinator::new(store, options);
//!     let summary = coordinator
//!         .import_all(Path::new(&config.import.source_dir))
//!         .await?;
//!
//!     println!(
//!         "{} files imported, {} failed",
//!         summary.succeeded.len(),
//!         summary.failed.len()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Timestamp Normalization
//!
//! Only strings of the exact form `YYYY-MM-DDTHH:MM:SS.mmmZ` become
//! timestamps. Everything else, including date-only strings, is kept as is:
//!
//! ```rust
//! use docseed::core::transform::normalize;
//! use docseed::domain::DocValue;
//! use serde_json::json;
//!
//! assert!(normalize(json!("2024-03-15T10:30:00.000Z")).as_timestamp().is_some());
//! assert_eq!(
//!     normalize(json!("2024-03-15")),
//!     DocValue::String("2024-03-15".to_string())
//! );
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], backed by
//! [`domain::DocseedError`]. Parse and commit errors are scoped to a single
//! export file and end up in the import summary; failing to list the source
//! directory aborts the run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
