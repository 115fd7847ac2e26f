//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output filtered by level or `RUST_LOG`
//! - JSON-formatted local file logs with daily or hourly rotation
//!
//! # Example
//!
//! ```no_run
//! use docseed::logging::init_logging;
//! use docseed::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a committed batch
///
/// The commit time is the store's own, when it reports one.
///
/// # Example
///
/// ```no_run
/// use docseed::log_batch_commit;
///
/// log_batch_commit!("questions", 2, 500, Some(chrono::Utc::now()));
/// log_batch_commit!("questions", 3, 120, dry_run);
/// ```
#[macro_export]
macro_rules! log_batch_commit {
    ($collection:expr, $batch_number:expr, $size:expr, dry_run) => {
        tracing::info!(
            collection = %$collection,
            batch = $batch_number,
            size = $size,
            dry_run = true,
            "Skipped batch commit"
        );
    };
    ($collection:expr, $batch_number:expr, $size:expr, $commit_time:expr) => {
        tracing::info!(
            collection = %$collection,
            batch = $batch_number,
            size = $size,
            commit_time = ?$commit_time,
            "Committed batch"
        );
    };
}

/// Log a file that failed to import
///
/// # Example
///
/// ```no_run
/// use docseed::log_file_failure;
///
/// log_file_failure!("users.json", "parse", "Invalid JSON");
/// ```
#[macro_export]
macro_rules! log_file_failure {
    ($file:expr, $kind:expr, $error:expr) => {
        tracing::error!(
            file = %$file,
            kind = %$kind,
            error = %$error,
            "File import failed"
        );
    };
}
