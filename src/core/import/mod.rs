//! Import pipeline
//!
//! - [`discovery`] lists export files in the source directory
//! - [`loader`] reads one export file into a collection and its documents
//! - [`committer`] normalizes documents and commits them in atomic batches
//! - [`coordinator`] drives the run and isolates per-file failures
//! - [`summary`] collects per-file outcomes

pub mod committer;
pub mod coordinator;
pub mod discovery;
pub mod loader;
pub mod summary;

pub use committer::{BatchCommitter, CommitOutcome};
pub use coordinator::{ImportCoordinator, ImportOptions};
pub use discovery::discover_export_files;
pub use loader::{load_export, parse_export, CollectionExport};
pub use summary::{CollectionImport, FailureKind, FileFailure, ImportSummary};
