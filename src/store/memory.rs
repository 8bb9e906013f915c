use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ResourceStore, StoreError, position};
use crate::resource::{RecordId, Resource};

/// Upper bound (exclusive) of generated numeric ids.
const ID_SPACE: u128 = 100_000;

/// How many records a delete removes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeleteMode {
    /// Exactly the matched record.
    #[default]
    Single,
    /// The matched record and the one after it, returning the matched one.
    /// Only for clients that depend on the old two-record removal.
    LegacyPair,
}

/// Process-lifetime store. Ids are random integers below 100000, collisions
/// not checked.
pub struct MemoryStore<R> {
    records: RwLock<Vec<R>>,
    delete_mode: DeleteMode,
}

impl<R: Resource> MemoryStore<R> {
    pub fn new(delete_mode: DeleteMode) -> Self {
        Self::with_records(Vec::new(), delete_mode)
    }

    /// Starts with [`Resource::fixtures`].
    pub fn seeded(delete_mode: DeleteMode) -> Self {
        Self::with_records(R::fixtures(), delete_mode)
    }

    pub fn with_records(records: Vec<R>, delete_mode: DeleteMode) -> Self {
        Self { records: RwLock::new(records), delete_mode }
    }

    fn next_id() -> RecordId {
        // `as` is lossless: the value is below ID_SPACE.
        RecordId::Num((Uuid::new_v4().as_u128() % ID_SPACE) as u64)
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for MemoryStore<R> {
    async fn create(&self, draft: R::Draft) -> Result<R, StoreError> {
        let record = R::from_draft(Self::next_id(), draft)?;
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn get(&self, id: &RecordId) -> Result<R, StoreError> {
        let records = self.records.read().await;
        records.iter().find(|r| r.id() == id).cloned().ok_or_else(R::not_found)
    }

    async fn update(&self, id: &RecordId, patch: R::Patch) -> Result<R, StoreError> {
        let mut records = self.records.write().await;
        let index = position(&records, id).ok_or_else(R::not_found)?;
        records[index].apply(patch);
        Ok(records[index].clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<R, StoreError> {
        let mut records = self.records.write().await;
        let index = position(&records, id).ok_or_else(R::not_found)?;
        let width = match self.delete_mode {
            DeleteMode::Single => 1,
            DeleteMode::LegacyPair => 2usize.min(records.len() - index),
        };
        let mut removed = records.drain(index..index + width);
        removed.next().ok_or_else(R::not_found)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }
}
