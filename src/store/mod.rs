//! Resource stores.
//!
//! Handlers never see a concrete store, only `Arc<dyn ResourceStore<R>>`
//! injected by the composition root. Two implementations:
//!
//! - [`MemoryStore`]: a `Vec` behind a lock, gone when the process exits.
//! - [`DocumentStore`]: a collection of a [`DocumentDb`], persisted as JSON.
//!
//! Neither coordinates concurrent writers beyond holding its lock for one
//! operation: two updates to the same record are last-write-wins.

mod document;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use document::{DocumentDb, DocumentStore};
pub use memory::{DeleteMode, MemoryStore};

use crate::resource::{RecordId, Resource};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("document i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("document decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// CRUD over an ordered collection of `R`.
#[async_trait]
pub trait ResourceStore<R: Resource>: Send + Sync {
    /// Validates `draft`, assigns an id, appends the record and returns it.
    /// A draft that fails validation leaves the store untouched.
    async fn create(&self, draft: R::Draft) -> Result<R, StoreError>;

    /// Every record, in store order.
    async fn list(&self) -> Result<Vec<R>, StoreError>;

    async fn get(&self, id: &RecordId) -> Result<R, StoreError>;

    /// Applies `patch` to the record and returns the merged result.
    async fn update(&self, id: &RecordId, patch: R::Patch) -> Result<R, StoreError>;

    /// Removes the record and returns it.
    async fn delete(&self, id: &RecordId) -> Result<R, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}

/// Position of the first record with `id`.
pub(crate) fn position<R: Resource>(records: &[R], id: &RecordId) -> Option<usize> {
    records.iter().position(|r| r.id() == id)
}
