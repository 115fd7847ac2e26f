//! Import summary and reporting
//!
//! This module defines structures for tracking and reporting per-file import
//! results.

use crate::domain::{CommitError, DocseedError, ParseError};
use std::fmt;
use std::time::Duration;

/// A file whose collection was fully committed
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionImport {
    /// Export file name
    pub file_name: String,

    /// Collection the file held
    pub collection: String,

    /// Documents committed (or that would be committed in a dry run)
    pub documents_committed: usize,

    /// Number of batches
    pub batches: usize,
}

/// Stage at which a file failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// File could not be loaded
    Parse,

    /// A batch commit failed
    Commit,

    /// A shutdown request stopped the file between batches
    Interrupted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Parse => write!(f, "parse"),
            FailureKind::Commit => write!(f, "commit"),
            FailureKind::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// A file that failed to import
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    /// Export file name
    pub file_name: String,

    /// Failure stage
    pub kind: FailureKind,

    /// Error detail
    pub message: String,

    /// Collection, when the file got far enough to name one
    pub collection: Option<String>,

    /// Documents committed before the failure
    pub committed: usize,
}

impl FileFailure {
    /// Failure from a load error
    pub fn from_parse(file_name: impl Into<String>, error: &ParseError) -> Self {
        Self {
            file_name: file_name.into(),
            kind: FailureKind::Parse,
            message: error.to_string(),
            collection: None,
            committed: 0,
        }
    }

    /// Failure from a batch commit error
    pub fn from_commit(file_name: impl Into<String>, error: &CommitError) -> Self {
        Self {
            file_name: file_name.into(),
            kind: FailureKind::Commit,
            message: error.source.to_string(),
            collection: Some(error.collection.to_string()),
            committed: error.committed,
        }
    }

    /// File stopped part way by a shutdown request
    pub fn interrupted(
        file_name: impl Into<String>,
        collection: impl Into<String>,
        committed: usize,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            kind: FailureKind::Interrupted,
            message: "Shutdown requested before all batches were committed".to_string(),
            collection: Some(collection.into()),
            committed,
        }
    }

    /// Failure from a file-scoped error
    ///
    /// Returns `None` for errors that are not scoped to a single file.
    pub fn from_error(file_name: impl Into<String>, error: &DocseedError) -> Option<Self> {
        match error {
            DocseedError::Parse(e) => Some(Self::from_parse(file_name, e)),
            DocseedError::Commit(e) => Some(Self::from_commit(file_name, e)),
            _ => None,
        }
    }
}

/// Summary of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    /// Files whose collection was fully committed
    pub succeeded: Vec<CollectionImport>,

    /// Files that failed
    pub failed: Vec<FileFailure>,

    /// Files discovered but not attempted because of a shutdown request
    pub skipped: Vec<String>,

    /// Whether commits were skipped
    pub dry_run: bool,

    /// Whether a shutdown request stopped the run early
    pub interrupted: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl ImportSummary {
    /// Create a new empty summary
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of files attempted
    pub fn files_processed(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Documents committed across all files, including partial commits of
    /// failed files
    pub fn total_documents(&self) -> usize {
        self.succeeded
            .iter()
            .map(|s| s.documents_committed)
            .chain(self.failed.iter().map(|f| f.committed))
            .sum()
    }

    /// Check if every discovered file was imported
    pub fn is_successful(&self) -> bool {
        self.failed.is_empty() && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            files = self.files_processed(),
            succeeded = self.succeeded.len(),
            failed = self.failed.len(),
            skipped = self.skipped.len(),
            documents = self.total_documents(),
            dry_run = self.dry_run,
            interrupted = self.interrupted,
            duration_ms = self.duration.as_millis() as u64,
            "Import completed"
        );

        for failure in &self.failed {
            tracing::warn!(
                file = %failure.file_name,
                kind = %failure.kind,
                committed = failure.committed,
                error = %failure.message,
                "Import failure"
            );
        }
    }
}
