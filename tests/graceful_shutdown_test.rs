//! Integration tests for graceful shutdown functionality
//!
//! These tests verify that:
//! - A shutdown request stops the run between files or batches
//! - The batch in flight is always committed in full
//! - Re-running after an interruption completes the import

use async_trait::async_trait;
use docseed::adapters::store::{CommitReceipt, DocumentStore, MemoryStore};
use docseed::cli::commands::import::{exit_code, EXIT_INTERRUPTED};
use docseed::core::import::{FailureKind, ImportCoordinator, ImportOptions};
use docseed::domain::{StoreError, WriteBatch};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::watch;

/// Raises the shutdown signal after its first commit
struct SignallingStore {
    inner: MemoryStore,
    shutdown: watch::Sender<bool>,
}

#[async_trait]
impl DocumentStore for SignallingStore {
    fn name(&self) -> &str {
        "signalling"
    }

    async fn commit(&self, batch: &WriteBatch) -> Result<CommitReceipt, StoreError> {
        let receipt = self.inner.commit(batch).await?;
        let _ = self.shutdown.send(true);
        Ok(receipt)
    }
}

fn write_export(dir: &Path, file: &str, collection: &str, count: usize) {
    let docs: serde_json::Map<String, serde_json::Value> = (0..count)
        .map(|i| (format!("{collection}-{i}"), serde_json::json!({"index": i})))
        .collect();
    let body = serde_json::json!({"__collection__": {collection: {"__doc__": docs}}});
    fs::write(dir.join(file), body.to_string()).unwrap();
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_shutdown_mid_collection_stops_after_current_batch() {
    let dir = TempDir::new().unwrap();
    write_export(dir.path(), "a_questions.json", "questions", 1200);
    write_export(dir.path(), "b_users.json", "users", 3);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let store = Arc::new(SignallingStore {
        inner: MemoryStore::new(),
        shutdown: shutdown_tx,
    });

    let summary = ImportCoordinator::new(store.clone(), ImportOptions::default())
        .with_shutdown(shutdown_rx)
        .import_all(dir.path())
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert_eq!(exit_code(&summary), EXIT_INTERRUPTED);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].kind, FailureKind::Interrupted);
    assert_eq!(summary.failed[0].committed, 500);
    assert_eq!(summary.skipped, vec!["b_users.json".to_string()]);

    // The first batch landed whole; nothing after it was sent
    assert_eq!(store.inner.commit_sizes(), vec![500]);
    assert_eq!(store.inner.collection_len("questions"), 500);
    assert_eq!(store.inner.collection_len("users"), 0);
}

#[tokio::test]
async fn test_shutdown_between_files() {
    let dir = TempDir::new().unwrap();
    write_export(dir.path(), "a_users.json", "users", 3);
    write_export(dir.path(), "b_subjects.json", "subjects", 3);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let store = Arc::new(SignallingStore {
        inner: MemoryStore::new(),
        shutdown: shutdown_tx,
    });

    let summary = ImportCoordinator::new(store.clone(), ImportOptions::default())
        .with_shutdown(shutdown_rx)
        .import_all(dir.path())
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(summary.succeeded[0].collection, "users");
    assert!(summary.failed.is_empty());
    assert_eq!(summary.skipped, vec!["b_subjects.json".to_string()]);
}

#[tokio::test]
async fn test_rerun_after_interruption_completes_import() {
    let dir = TempDir::new().unwrap();
    write_export(dir.path(), "questions.json", "questions", 1200);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let store = Arc::new(SignallingStore {
        inner: MemoryStore::new(),
        shutdown: shutdown_tx,
    });
    let interrupted = ImportCoordinator::new(store.clone(), ImportOptions::default())
        .with_shutdown(shutdown_rx)
        .import_all(dir.path())
        .await
        .unwrap();
    assert!(interrupted.interrupted);

    // A second run without a shutdown signal finishes the collection
    let summary = ImportCoordinator::new(store.clone(), ImportOptions::default())
        .import_all(dir.path())
        .await
        .unwrap();

    assert!(summary.is_successful());
    assert_eq!(store.inner.collection_len("questions"), 1200);
}
