//! The `DatasetStore` trait and its in-memory implementation.
//!
//! The dashboard holds exactly one dataset at a time. Readers take a cheap
//! [`Arc`] snapshot; a successful upload swaps the whole dataset. There is no
//! partial merge, and nothing is persisted across restarts.

use std::{convert::Infallible, future::Future, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{record::RecordTable, sample};

/// Source label of the built-in sample dataset.
pub const SAMPLE_SOURCE: &str = "sample";

// ─── Dataset ─────────────────────────────────────────────────────────────────

/// A loaded record table plus the metadata identifying that load.
#[derive(Debug, Clone)]
pub struct Dataset {
  /// Fresh for every load; lets the page tell which table it is looking at.
  pub revision:  Uuid,
  /// `"sample"` or the uploaded file name.
  pub source:    String,
  pub loaded_at: DateTime<Utc>,
  pub table:     RecordTable,
}

impl Dataset {
  pub fn new(source: impl Into<String>, table: RecordTable) -> Self {
    Self {
      revision: Uuid::new_v4(),
      source: source.into(),
      loaded_at: Utc::now(),
      table,
    }
  }

  pub fn sample() -> Self { Self::new(SAMPLE_SOURCE, sample::table()) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over where the current dataset lives.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait DatasetStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The dataset as of now. Later replacements do not affect the snapshot.
  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<Arc<Dataset>, Self::Error>> + Send + '_;

  /// Atomically replace the current dataset and return the stored copy.
  fn replace(
    &self,
    dataset: Dataset,
  ) -> impl Future<Output = Result<Arc<Dataset>, Self::Error>> + Send + '_;
}

// ─── In-memory store ─────────────────────────────────────────────────────────

/// Process-wide dataset held behind an async read-write lock.
///
/// Clones share the same slot.
#[derive(Clone)]
pub struct MemoryStore {
  current: Arc<RwLock<Arc<Dataset>>>,
}

impl MemoryStore {
  pub fn new(initial: Dataset) -> Self {
    Self {
      current: Arc::new(RwLock::new(Arc::new(initial))),
    }
  }

  /// A store seeded with the built-in sample.
  pub fn with_sample() -> Self { Self::new(Dataset::sample()) }
}

impl Default for MemoryStore {
  fn default() -> Self { Self::with_sample() }
}

impl DatasetStore for MemoryStore {
  type Error = Infallible;

  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<Arc<Dataset>, Self::Error>> + Send + '_ {
    async move { Ok(Arc::clone(&*self.current.read().await)) }
  }

  fn replace(
    &self,
    dataset: Dataset,
  ) -> impl Future<Output = Result<Arc<Dataset>, Self::Error>> + Send + '_ {
    async move {
      let dataset = Arc::new(dataset);
      *self.current.write().await = Arc::clone(&dataset);
      Ok(dataset)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::{REQUIRED_COLUMNS, RecordTable};

  fn empty_table() -> RecordTable {
    let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    RecordTable::new(columns, vec![]).unwrap()
  }

  #[tokio::test]
  async fn starts_with_sample() {
    let store = MemoryStore::with_sample();
    let snap = store.snapshot().await.unwrap();
    assert_eq!(snap.source, SAMPLE_SOURCE);
    assert_eq!(snap.table.len(), 10);
  }

  #[tokio::test]
  async fn replace_swaps_whole_dataset() {
    let store = MemoryStore::with_sample();
    let before = store.snapshot().await.unwrap();

    let stored = store
      .replace(Dataset::new("upload.csv", empty_table()))
      .await
      .unwrap();
    let after = store.snapshot().await.unwrap();

    assert_ne!(before.revision, after.revision);
    assert_eq!(stored.revision, after.revision);
    assert_eq!(after.source, "upload.csv");
    assert!(after.table.is_empty());
    // The earlier snapshot is untouched by the swap.
    assert_eq!(before.table.len(), 10);
  }

  #[tokio::test]
  async fn clones_share_the_slot() {
    let store = MemoryStore::with_sample();
    let other = store.clone();
    other
      .replace(Dataset::new("other.csv", empty_table()))
      .await
      .unwrap();
    assert_eq!(store.snapshot().await.unwrap().source, "other.csv");
  }
}
