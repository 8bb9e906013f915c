use serde::{Deserialize, Serialize};

use super::{RecordId, Resource, merge, required};
use crate::store::StoreError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Resource for User {
    const NAME: &'static str = "User";
    const KEY: &'static str = "user";

    type Draft = UserDraft;
    type Patch = UserPatch;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn from_draft(id: RecordId, draft: UserDraft) -> Result<Self, StoreError> {
        Ok(Self {
            id,
            name: required(draft.name)?,
            email: required(draft.email)?,
            phone: required(draft.phone)?,
        })
    }

    fn apply(&mut self, patch: UserPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.email, patch.email);
        merge(&mut self.phone, patch.phone);
    }

    fn fixtures() -> Vec<Self> {
        [
            (10137, "Shiva", "shiva@gmail.com", "423523525"),
            (96951, "Suresh", "suresh@gmail.com", "354534534"),
            (60512, "Shubham", "shub@gmail.com", "635456456"),
        ]
        .into_iter()
        .map(|(id, name, email, phone)| Self {
            id: RecordId::Num(id),
            name: name.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
        })
        .collect()
    }
}
