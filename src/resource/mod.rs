//! Resource model: record types, identifiers, and their HTTP surface.
//!
//! A [`Resource`] is a record type with a create draft (every field optional,
//! so presence can be checked) and a patch (every field optional, so absent
//! fields can be kept). [`routes`] turns a store of any resource into the
//! five CRUD endpoints.

mod handlers;
mod post;
mod user;

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use post::{Post, PostDraft, PostPatch};
pub use user::{User, UserDraft, UserPatch};

use crate::handler::{Handler, HandlerResult};
use crate::request::Request;
use crate::router::Router;
use crate::store::{ResourceStore, StoreError};

/// Message of every failed presence check.
pub const FIELDS_REQUIRED: &str = "All fields are required";

// ── RecordId ──────────────────────────────────────────────────────────────────

/// A record identifier.
///
/// The in-memory store hands out small integers; the document store hands out
/// UUID keys. On the wire they are a JSON number and a JSON string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Num(u64),
    Key(String),
}

/// A path segment that is all digits is a numeric id; anything else is a key.
impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => Self::Num(n),
            Err(_) => Self::Key(s.to_owned()),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self::Num(n)
    }
}

// ── Resource ──────────────────────────────────────────────────────────────────

/// A CRUD-able record type.
pub trait Resource: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Capitalised name used in messages (`"User"`).
    const NAME: &'static str;

    /// Key the record is wrapped under in mutation responses (`"user"`).
    const KEY: &'static str;

    /// Create payload. Fields are optional so a missing one is a validation
    /// error rather than a parse error.
    type Draft: DeserializeOwned + Send + 'static;

    /// Update payload.
    type Patch: DeserializeOwned + Send + 'static;

    fn id(&self) -> &RecordId;

    /// Validates `draft` and builds the record. Empty strings count as missing.
    fn from_draft(id: RecordId, draft: Self::Draft) -> Result<Self, StoreError>;

    /// Overwrites the fields `patch` supplies with a non-empty value.
    fn apply(&mut self, patch: Self::Patch);

    /// Records an in-memory store starts with when seeding is on.
    fn fixtures() -> Vec<Self> {
        Vec::new()
    }

    fn not_found() -> StoreError {
        StoreError::NotFound(format!("{} not found", Self::NAME))
    }
}

pub(crate) fn required(value: Option<String>) -> Result<String, StoreError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StoreError::Validation(FIELDS_REQUIRED.to_owned()))
}

pub(crate) fn merge(slot: &mut String, value: Option<String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        *slot = v;
    }
}

// ── Routes ────────────────────────────────────────────────────────────────────

/// The CRUD router for one store, meant to be nested under a prefix:
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `/` | list |
/// | POST | `/` | create |
/// | GET | `/{id}` | get |
/// | PUT | `/{id}` | update |
/// | DELETE | `/{id}` | delete |
pub fn routes<R: Resource>(store: Arc<dyn ResourceStore<R>>) -> Router {
    Router::new()
        .get("/", bind(&store, handlers::list::<R>))
        .post("/", bind(&store, handlers::create::<R>))
        .get("/{id}", bind(&store, handlers::get::<R>))
        .put("/{id}", bind(&store, handlers::update::<R>))
        .delete("/{id}", bind(&store, handlers::delete::<R>))
}

fn bind<R, F, Fut>(store: &Arc<dyn ResourceStore<R>>, f: F) -> impl Handler
where
    R: Resource,
    F: Fn(Arc<dyn ResourceStore<R>>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    let store = Arc::clone(store);
    move |req: Request| f(Arc::clone(&store), req)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_ids_parse_and_serialise() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::Num(42));
        assert_eq!("abc".parse::<RecordId>().unwrap(), RecordId::Key("abc".into()));
        assert_eq!("-1".parse::<RecordId>().unwrap(), RecordId::Key("-1".into()));

        assert_eq!(serde_json::to_string(&RecordId::Num(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&RecordId::Key("k".into())).unwrap(), r#""k""#);
        assert_eq!(serde_json::from_str::<RecordId>("7").unwrap(), RecordId::Num(7));
        assert_eq!(RecordId::Key("f00".into()).to_string(), "f00");
    }

    #[test]
    fn presence_and_merge_treat_empty_as_absent() {
        assert!(required(Some(String::new())).is_err());
        assert!(required(None).is_err());
        assert_eq!(required(Some("a".into())).unwrap(), "a");

        let mut slot = String::from("old");
        merge(&mut slot, Some(String::new()));
        merge(&mut slot, None);
        assert_eq!(slot, "old");
        merge(&mut slot, Some("new".into()));
        assert_eq!(slot, "new");
    }
}
