use serde::{Deserialize, Serialize};

use super::{RecordId, Resource, merge, required};
use crate::store::StoreError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: RecordId,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostDraft {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Resource for Post {
    const NAME: &'static str = "Post";
    const KEY: &'static str = "post";

    type Draft = PostDraft;
    type Patch = PostPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: PostDraft) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            title: required(draft.title)?,
            description: required(draft.description)?,
        })
    }

    fn apply(&mut self, patch: PostPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
    }

    fn fixtures() -> Vec<Self> {
        [
            (13311, "Sample title", "Sample description"),
            (24622, "Another title", "Another description"),
            (35933, "Third title", "Third description"),
            (47244, "Fourth title", "Fourth description"),
        ]
        .into_iter()
        .map(|(id, title, description)| Self {
            id: RecordId::Num(id),
            title: title.to_owned(),
            description: description.to_owned(),
        })
        .collect()
    }
}
