//! Batch committer
//!
//! Normalizes each document of a collection and commits the results as
//! full-document upserts in bounded atomic batches. Batches are committed
//! one at a time, each awaited before the next is formed.

use crate::adapters::store::DocumentStore;
use crate::core::transform::normalize_fields;
use crate::domain::{CollectionName, CommitError, DocumentId, WriteBatch, MAX_BATCH_WRITES};
use crate::log_batch_commit;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::watch;

/// Result of committing one collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Documents committed (staged only, in a dry run)
    pub committed: usize,

    /// Batches committed
    pub batches: usize,

    /// Whether a shutdown request stopped the collection early
    pub interrupted: bool,
}

/// Commits collections to a [`DocumentStore`] in bounded batches
pub struct BatchCommitter {
    store: Arc<dyn DocumentStore>,
    batch_size: usize,
    dry_run: bool,
    shutdown: Option<watch::Receiver<bool>>,
}

impl BatchCommitter {
    /// Create a committer
    ///
    /// The effective batch size is the smallest of `batch_size`, the store's
    /// own ceiling and [`MAX_BATCH_WRITES`], and at least one.
    pub fn new(store: Arc<dyn DocumentStore>, batch_size: usize) -> Self {
        let batch_size = batch_size
            .min(store.max_batch_size())
            .clamp(1, MAX_BATCH_WRITES);
        Self {
            store,
            batch_size,
            dry_run: false,
            shutdown: None,
        }
    }

    /// Form batches without sending them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Stop between batches once the signal turns `true`
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Effective batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Normalize and commit every document of a collection
    ///
    /// # Errors
    ///
    /// Returns a [`CommitError`] on the first failed batch. Batches committed
    /// before it stay in the store and are counted in `committed`.
    pub async fn commit_all(
        &self,
        collection: &CollectionName,
        documents: Vec<(DocumentId, Map<String, Value>)>,
    ) -> Result<CommitOutcome, CommitError> {
        let mut outcome = CommitOutcome::default();
        let mut batch = WriteBatch::new(collection.clone(), self.batch_size);
        let mut documents = documents.into_iter().peekable();

        while let Some((document_id, body)) = documents.next() {
            batch.set(document_id, normalize_fields(body));

            if batch.is_full() {
                self.flush(&mut batch, &mut outcome).await?;

                if documents.peek().is_some() && self.shutdown_requested() {
                    tracing::warn!(
                        collection = %collection,
                        committed = outcome.committed,
                        "Shutdown requested, stopping collection between batches"
                    );
                    outcome.interrupted = true;
                    return Ok(outcome);
                }
            }
        }

        if !batch.is_empty() {
            self.flush(&mut batch, &mut outcome).await?;
        }

        Ok(outcome)
    }

    async fn flush(
        &self,
        batch: &mut WriteBatch,
        outcome: &mut CommitOutcome,
    ) -> Result<(), CommitError> {
        let pending = batch.take();
        let batch_number = outcome.batches + 1;

        if self.dry_run {
            log_batch_commit!(pending.collection(), batch_number, pending.len(), dry_run);
        } else {
            let receipt = self
                .store
                .commit(&pending)
                .await
                .map_err(|source| CommitError {
                    collection: pending.collection().clone(),
                    committed: outcome.committed,
                    source,
                })?;
            log_batch_commit!(
                pending.collection(),
                batch_number,
                receipt.writes,
                receipt.commit_time
            );
        }

        outcome.batches = batch_number;
        outcome.committed += pending.len();
        Ok(())
    }
}
