//! Document store abstraction
//!
//! This module defines the trait a store must implement to receive batched
//! imports.

use crate::domain::{StoreError, WriteBatch, MAX_BATCH_WRITES};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Acknowledgement of a committed batch
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReceipt {
    /// Number of writes applied
    pub writes: usize,

    /// Server commit time, when the store reports one
    pub commit_time: Option<DateTime<Utc>>,
}

/// Document store trait for batched upserts
///
/// A commit applies every write in the batch or none of them. Each write is a
/// full replacement of the target document, so committing the same batch twice
/// leaves the store unchanged after the first commit.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short store name used in logs
    fn name(&self) -> &str;

    /// Largest batch the store accepts in one commit
    fn max_batch_size(&self) -> usize {
        MAX_BATCH_WRITES
    }

    /// Atomically commit a batch of upserts
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the batch was not applied. No write from a
    /// failed batch is visible afterwards.
    async fn commit(&self, batch: &WriteBatch) -> Result<CommitReceipt, StoreError>;
}
