//! Import coordinator - main orchestrator for the import process
//!
//! Discovers export files, then loads and commits them one at a time. A
//! file that fails to parse or commit is recorded and the run moves on to
//! the next file. Only failing to list the source directory aborts the run.

use crate::adapters::store::DocumentStore;
use crate::config::ImportConfig;
use crate::core::import::committer::BatchCommitter;
use crate::core::import::discovery::discover_export_files;
use crate::core::import::loader::load_export;
use crate::core::import::summary::{CollectionImport, FileFailure, ImportSummary};
use crate::domain::{Result, MAX_BATCH_WRITES};
use crate::log_file_failure;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Options for an import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Recognised export file extensions, without the dot
    pub extensions: Vec<String>,

    /// Writes per batch
    pub batch_size: usize,

    /// Load and batch without committing
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["json".to_string()],
            batch_size: MAX_BATCH_WRITES,
            dry_run: false,
        }
    }
}

impl ImportOptions {
    /// Build options from the `[import]` section
    pub fn from_config(config: &ImportConfig, dry_run: bool) -> Self {
        Self {
            extensions: config.extensions.clone(),
            batch_size: config.batch_size,
            dry_run,
        }
    }
}

/// Outcome of a single file
enum FileOutcome {
    Imported(CollectionImport),
    Interrupted(FileFailure),
}

/// Import coordinator
pub struct ImportCoordinator {
    committer: BatchCommitter,
    options: ImportOptions,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ImportCoordinator {
    /// Create a coordinator writing to `store`
    pub fn new(store: Arc<dyn DocumentStore>, options: ImportOptions) -> Self {
        tracing::debug!(
            store = store.name(),
            batch_size = options.batch_size,
            dry_run = options.dry_run,
            "Creating import coordinator"
        );
        let committer = BatchCommitter::new(store, options.batch_size).with_dry_run(options.dry_run);
        Self {
            committer,
            options,
            shutdown: None,
        }
    }

    /// Stop between files and between batches once the signal turns `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.committer = self.committer.with_shutdown(shutdown.clone());
        self.shutdown = Some(shutdown);
        self
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Import every export file in `source_dir`
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::DocseedError::Discovery`] if the directory cannot be listed.
    /// File-scoped failures are reported in the summary instead.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use docseed::adapters::store::MemoryStore;
    /// use docseed::core::import::{ImportCoordinator, ImportOptions};
    /// use std::path::Path;
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> docseed::domain::Result<()> {
    /// let store = Arc::new(MemoryStore::new());
    /// let coordinator = ImportCoordinator::new(store, ImportOptions::default());
    /// let summary = coordinator.import_all(Path::new("./firestore_data")).await?;
    /// assert!(summary.is_successful());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn import_all(&self, source_dir: &Path) -> Result<ImportSummary> {
        let start_time = Instant::now();
        let mut summary = ImportSummary::new(self.options.dry_run);

        tracing::info!(
            source_dir = %source_dir.display(),
            dry_run = self.options.dry_run,
            "Starting import"
        );

        let files = discover_export_files(source_dir, &self.options.extensions).await?;
        let mut remaining = files.iter();

        while let Some(path) = remaining.next() {
            let file_name = display_name(path);

            if self.shutdown_requested() {
                tracing::warn!("Shutdown requested, skipping remaining files");
                summary.interrupted = true;
                summary.skipped.push(file_name);
                summary.skipped.extend(remaining.by_ref().map(|p| display_name(p)));
                break;
            }

            match self.import_file(path, &file_name).await {
                Ok(FileOutcome::Imported(import)) => {
                    tracing::info!(
                        file = %import.file_name,
                        collection = %import.collection,
                        documents = import.documents_committed,
                        batches = import.batches,
                        "File imported"
                    );
                    summary.succeeded.push(import);
                }
                Ok(FileOutcome::Interrupted(failure)) => {
                    log_file_failure!(failure.file_name, failure.kind, failure.message);
                    summary.interrupted = true;
                    summary.failed.push(failure);
                    summary.skipped.extend(remaining.by_ref().map(|p| display_name(p)));
                    break;
                }
                Err(e) => match FileFailure::from_error(file_name.as_str(), &e) {
                    Some(failure) => {
                        log_file_failure!(failure.file_name, failure.kind, failure.message);
                        summary.failed.push(failure);
                    }
                    None => return Err(e),
                },
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn import_file(&self, path: &Path, file_name: &str) -> Result<FileOutcome> {
        tracing::info!(file = %file_name, "Importing file");

        let export = load_export(path).await?;
        let collection = export.collection;

        let outcome = self
            .committer
            .commit_all(&collection, export.documents)
            .await?;

        if outcome.interrupted {
            return Ok(FileOutcome::Interrupted(FileFailure::interrupted(
                file_name,
                collection.as_str(),
                outcome.committed,
            )));
        }

        Ok(FileOutcome::Imported(CollectionImport {
            file_name: file_name.to_string(),
            collection: collection.into_inner(),
            documents_committed: outcome.committed,
            batches: outcome.batches,
        }))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
