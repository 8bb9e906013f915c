//! The composition root: opens the stores the config asks for and wires
//! every router into one [`Service`].

use std::sync::Arc;

use crate::app::{App, Service};
use crate::boundary::ErrorBoundary;
use crate::config::{Config, StoreKind};
use crate::demo;
use crate::health;
use crate::method::Method;
use crate::middleware::{AuthGate, Timestamp, Trace};
use crate::resource::{self, Post, User};
use crate::store::{DeleteMode, DocumentDb, MemoryStore, ResourceStore, StoreError};

/// One store per resource, shared by that resource's handlers.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn ResourceStore<User>>,
    pub posts: Arc<dyn ResourceStore<Post>>,
}

impl Stores {
    pub fn memory(seed: bool, delete_mode: DeleteMode) -> Self {
        if seed {
            Self {
                users: Arc::new(MemoryStore::<User>::seeded(delete_mode)),
                posts: Arc::new(MemoryStore::<Post>::seeded(delete_mode)),
            }
        } else {
            Self {
                users: Arc::new(MemoryStore::<User>::new(delete_mode)),
                posts: Arc::new(MemoryStore::<Post>::new(delete_mode)),
            }
        }
    }

    pub async fn document(uri: &str) -> Result<Self, StoreError> {
        let db = DocumentDb::connect(uri).await?;
        Ok(Self {
            users: Arc::new(db.collection::<User>("users").await?),
            posts: Arc::new(db.collection::<Post>("posts").await?),
        })
    }

    pub async fn open(config: &Config) -> Result<Self, StoreError> {
        match config.store {
            StoreKind::Memory => {
                let mode = if config.legacy_pair_delete {
                    DeleteMode::LegacyPair
                } else {
                    DeleteMode::Single
                };
                Ok(Self::memory(config.seed, mode))
            }
            StoreKind::Document => Self::document(&config.database_uri).await,
        }
    }
}

/// Routes, in order:
///
/// | Prefix | Router |
/// |---|---|
/// | `/` | landing text, health probes, `/fail` |
/// | `/users` | user CRUD |
/// | `/posts` | post CRUD |
/// | `/test-routes` | auth demo |
///
/// Every request is timestamped, then traced; the error boundary is attached
/// last.
pub fn application(config: &Config, stores: Stores) -> Service {
    let gate = AuthGate::with_header(config.auth_header.as_str(), config.auth_token.as_str());

    App::new()
        .route(Method::Get, "/", demo::index)
        .route(Method::Get, "/healthz", health::liveness)
        .route(Method::Get, "/readyz", health::readiness)
        .route(Method::Get, "/fail", demo::fail)
        .nest("/users", resource::routes(stores.users))
        .nest("/posts", resource::routes(stores.posts))
        .nest("/test-routes", demo::test_routes(gate, &config.auth_token))
        .layer(Timestamp)
        .layer(Trace)
        .finish(ErrorBoundary::new().redacted(config.redact_errors))
}
