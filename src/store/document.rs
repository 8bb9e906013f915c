//! File-backed document database.
//!
//! A [`DocumentDb`] is a directory; each collection is one JSON array file in
//! it. Collections are loaded on open and written through on every mutation
//! (temp file + rename, so a crash leaves either the old or the new array).
//! The operations follow the usual document-driver vocabulary:
//! `create`, `find`, `find_by_id`, `find_by_id_and_update`,
//! `find_by_id_and_delete`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ResourceStore, StoreError, position};
use crate::resource::{RecordId, Resource};

const FILE_SCHEME: &str = "file://";

/// A connected document database.
#[derive(Clone, Debug)]
pub struct DocumentDb {
    root: PathBuf,
}

impl DocumentDb {
    /// Opens the database at `uri` (`file:///var/lib/pinax` or a bare
    /// directory path), creating the directory if needed.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let root = PathBuf::from(uri.strip_prefix(FILE_SCHEME).unwrap_or(uri));
        fs::create_dir_all(&root).await?;
        info!(root = %root.display(), "document database connected");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens (or creates) the collection `name`.
    pub async fn collection<R: Resource>(&self, name: &str) -> Result<DocumentStore<R>, StoreError> {
        let path = self.root.join(format!("{name}.json"));
        let docs = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(collection = name, documents = docs.len(), "collection opened");
        Ok(DocumentStore { path, docs: Mutex::new(docs) })
    }
}

/// One persisted collection. Ids are hyphenated UUID keys, which never
/// parse as numeric ids.
pub struct DocumentStore<R> {
    path: PathBuf,
    docs: Mutex<Vec<R>>,
}

impl<R: Resource> DocumentStore<R> {
    pub async fn find(&self) -> Vec<R> {
        self.docs.lock().await.clone()
    }

    pub async fn find_by_id(&self, id: &RecordId) -> Option<R> {
        let docs = self.docs.lock().await;
        docs.iter().find(|d| d.id() == id).cloned()
    }

    /// Returns the updated document, or `None` if no document has `id`.
    pub async fn find_by_id_and_update(&self, id: &RecordId, patch: R::Patch) -> Result<Option<R>, StoreError> {
        let mut docs = self.docs.lock().await;
        let Some(index) = position(&docs, id) else {
            return Ok(None);
        };
        let mut updated = docs[index].clone();
        updated.apply(patch);
        let previous = std::mem::replace(&mut docs[index], updated.clone());
        if let Err(e) = self.flush(&docs).await {
            docs[index] = previous;
            return Err(e);
        }
        Ok(Some(updated))
    }

    /// Returns the removed document, or `None` if no document has `id`.
    pub async fn find_by_id_and_delete(&self, id: &RecordId) -> Result<Option<R>, StoreError> {
        let mut docs = self.docs.lock().await;
        let Some(index) = position(&docs, id) else {
            return Ok(None);
        };
        let removed = docs.remove(index);
        if let Err(e) = self.flush(&docs).await {
            docs.insert(index, removed);
            return Err(e);
        }
        Ok(Some(removed))
    }

    async fn insert(&self, doc: R) -> Result<R, StoreError> {
        let mut docs = self.docs.lock().await;
        docs.push(doc.clone());
        if let Err(e) = self.flush(&docs).await {
            docs.pop();
            return Err(e);
        }
        Ok(doc)
    }

    async fn flush(&self, docs: &[R]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(docs)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl<R: Resource> ResourceStore<R> for DocumentStore<R> {
    async fn create(&self, draft: R::Draft) -> Result<R, StoreError> {
        let id = RecordId::Key(Uuid::new_v4().to_string());
        self.insert(R::from_draft(id, draft)?).await
    }

    async fn list(&self) -> Result<Vec<R>, StoreError> {
        Ok(self.find().await)
    }

    async fn get(&self, id: &RecordId) -> Result<R, StoreError> {
        self.find_by_id(id).await.ok_or_else(R::not_found)
    }

    async fn update(&self, id: &RecordId, patch: R::Patch) -> Result<R, StoreError> {
        self.find_by_id_and_update(id, patch).await?.ok_or_else(R::not_found)
    }

    async fn delete(&self, id: &RecordId) -> Result<R, StoreError> {
        self.find_by_id_and_delete(id).await?.ok_or_else(R::not_found)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.docs.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Post, PostDraft, PostPatch};

    fn draft(title: &str) -> PostDraft {
        PostDraft { title: Some(title.into()), description: Some("d".into()) }
    }

    #[tokio::test]
    async fn documents_survive_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("file://{}", dir.path().display());

        let db = DocumentDb::connect(&uri).await.unwrap();
        let posts = db.collection::<Post>("posts").await.unwrap();
        let first = posts.create(draft("one")).await.unwrap();
        let second = posts.create(draft("two")).await.unwrap();
        assert!(matches!(&first.id, RecordId::Key(k) if k.len() == 36));
        posts
            .update(&second.id, PostPatch { title: Some("TWO".into()), description: None })
            .await
            .unwrap();
        posts.delete(&first.id).await.unwrap();

        let reopened = DocumentDb::connect(dir.path().to_str().unwrap())
            .await
            .unwrap()
            .collection::<Post>("posts")
            .await
            .unwrap();
        let all = reopened.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "TWO");
        assert_eq!(all[0].description, "d");
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let db = DocumentDb::connect(dir.path().to_str().unwrap()).await.unwrap();
        let posts = db.collection::<Post>("posts").await.unwrap();
        let id = RecordId::Key("nope".into());
        assert!(matches!(posts.get(&id).await, Err(StoreError::NotFound(_))));
        assert!(posts.find_by_id_and_delete(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalid_draft_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let db = DocumentDb::connect(dir.path().to_str().unwrap()).await.unwrap();
        let posts = db.collection::<Post>("posts").await.unwrap();
        assert!(matches!(
            posts.create(PostDraft::default()).await,
            Err(StoreError::Validation(_))
        ));
        assert!(!db.root().join("posts.json").exists());
    }

    #[tokio::test]
    async fn corrupt_collection_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("posts.json"), b"{oops").unwrap();
        let db = DocumentDb::connect(dir.path().to_str().unwrap()).await.unwrap();
        assert!(matches!(db.collection::<Post>("posts").await, Err(StoreError::Decode(_))));
    }
}
