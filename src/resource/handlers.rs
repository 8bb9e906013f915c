//! CRUD handlers, generic over the resource and its store.
//!
//! Success bodies:
//! - list: `{"data": [...]}`
//! - get: `{"data": record}`
//! - create (201), update, delete: `{"message": "<Name> <verb> successfully", "<key>": record}`
//!
//! Failures are returned as [`ApiError`]s and rendered by the error boundary.

use std::sync::Arc;

use http::StatusCode;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::{RecordId, Resource};
use crate::error::ApiError;
use crate::handler::HandlerResult;
use crate::request::Request;
use crate::response::Response;
use crate::store::ResourceStore;

type Store<R> = Arc<dyn ResourceStore<R>>;

pub(super) async fn list<R: Resource>(store: Store<R>, _req: Request) -> HandlerResult {
    let records = store.list().await?;
    Ok(Response::json(&json!({ "data": records })))
}

pub(super) async fn create<R: Resource>(store: Store<R>, req: Request) -> HandlerResult {
    let draft: R::Draft = req.json()?;
    let record = store.create(draft).await?;
    debug!(resource = R::NAME, id = %record.id(), "created");
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .json(&envelope::<R>("created", &record)))
}

pub(super) async fn get<R: Resource>(store: Store<R>, req: Request) -> HandlerResult {
    let id = path_id(&req)?;
    let record = store.get(&id).await?;
    Ok(Response::json(&json!({ "data": record })))
}

pub(super) async fn update<R: Resource>(store: Store<R>, req: Request) -> HandlerResult {
    let id = path_id(&req)?;
    let patch: R::Patch = req.json()?;
    let record = store.update(&id, patch).await?;
    debug!(resource = R::NAME, %id, "updated");
    Ok(Response::json(&envelope::<R>("updated", &record)))
}

pub(super) async fn delete<R: Resource>(store: Store<R>, req: Request) -> HandlerResult {
    let id = path_id(&req)?;
    let record = store.delete(&id).await?;
    debug!(resource = R::NAME, %id, "deleted");
    Ok(Response::json(&envelope::<R>("deleted", &record)))
}

fn path_id(req: &Request) -> Result<RecordId, ApiError> {
    let raw = req
        .param("id")
        .ok_or_else(|| ApiError::Internal("route has no {id} parameter".to_owned()))?;
    let Ok(id) = raw.parse::<RecordId>();
    Ok(id)
}

fn envelope<R: Resource>(verb: &str, record: &R) -> Value {
    let mut body = Map::new();
    body.insert("message".to_owned(), json!(format!("{} {verb} successfully", R::NAME)));
    body.insert(R::KEY.to_owned(), json!(record));
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::resource::User;
    use crate::store::{DeleteMode, MemoryStore};

    fn store() -> Store<User> {
        Arc::new(MemoryStore::<User>::seeded(DeleteMode::Single))
    }

    fn with_id(method: Method, id: &str) -> Request {
        let mut req = Request::new(method, &format!("/users/{id}"));
        req.params.insert("id".to_owned(), id.to_owned());
        req
    }

    fn body(res: &Response) -> Value {
        serde_json::from_slice(res.body()).unwrap()
    }

    #[tokio::test]
    async fn create_wraps_record_under_key() {
        let req = Request::new(Method::Post, "/users")
            .with_json(&json!({ "name": "A", "email": "a@x.com", "phone": "1" }));
        let res = create(store(), req).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::CREATED);

        let body = body(&res);
        assert_eq!(body["message"], "User created successfully");
        assert_eq!(body["user"]["name"], "A");
        assert!(body["user"]["id"].is_u64());
    }

    #[tokio::test]
    async fn create_rejects_missing_fields() {
        let store = store();
        let req = Request::new(Method::Post, "/users").with_json(&json!({ "name": "A" }));
        let err = create(Arc::clone(&store), req).await.unwrap_err();
        assert_eq!(err, ApiError::Validation("All fields are required".into()));
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn list_is_ok_with_data() {
        let res = list(store(), Request::new(Method::Get, "/users")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::OK);
        assert_eq!(body(&res)["data"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn get_unknown_and_non_numeric_ids_are_not_found() {
        for id in ["1", "abc"] {
            let err = get(store(), with_id(Method::Get, id)).await.unwrap_err();
            assert_eq!(err, ApiError::NotFound("User not found".into()));
        }
        let res = get(store(), with_id(Method::Get, "96951")).await.unwrap();
        assert_eq!(body(&res)["data"]["name"], "Suresh");
    }

    #[tokio::test]
    async fn update_merges_and_reports() {
        let req = with_id(Method::Put, "10137").with_json(&json!({ "phone": "000", "name": "" }));
        let res = update(store(), req).await.unwrap();
        let body = body(&res);
        assert_eq!(body["message"], "User updated successfully");
        assert_eq!(body["user"]["name"], "Shiva");
        assert_eq!(body["user"]["phone"], "000");
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let store = store();
        let res = delete(Arc::clone(&store), with_id(Method::Delete, "96951")).await.unwrap();
        assert_eq!(body(&res)["user"]["id"], 96951);
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
