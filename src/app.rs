//! Application composition.
//!
//! [`App`] collects routers under path prefixes. [`App::finish`] takes the
//! [`ErrorBoundary`] and consumes the composer, so nothing can be registered
//! after the boundary: every route is covered by it.

use http::StatusCode;

use crate::boundary::ErrorBoundary;
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::router::{RouteTable, Router};

/// The composition root.
#[derive(Default)]
pub struct App {
    root: Router,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage that runs before every route in the application.
    pub fn layer(mut self, stage: impl Middleware) -> Self {
        self.root = self.root.layer(stage);
        self
    }

    pub fn route(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.root = self.root.on(method, path, handler);
        self
    }

    /// Mounts `router` under `prefix` (`"/users"`, `"/test-routes"`, …).
    pub fn nest(mut self, prefix: &str, router: Router) -> Self {
        self.root = self.root.nest(prefix, router);
        self
    }

    /// Mounts `router` at the root.
    pub fn merge(self, router: Router) -> Self {
        self.nest("/", router)
    }

    /// Seals the application behind `boundary`.
    ///
    /// # Panics
    ///
    /// Panics if any registered path is invalid or two paths conflict.
    pub fn finish(self, boundary: ErrorBoundary) -> Service {
        Service { table: self.root.into_table(), boundary }
    }
}

/// A finished application: routes plus the error boundary.
pub struct Service {
    table: RouteTable,
    boundary: ErrorBoundary,
}

impl Service {
    /// Routes one request and produces exactly one response.
    pub async fn handle(&self, mut req: Request) -> Response {
        let method = req.method();
        let Some((chain, params)) = self.table.lookup(method, req.path()) else {
            return Response::message(StatusCode::NOT_FOUND, "Not found");
        };
        req.params = params;

        let path = req.path().to_owned();
        match chain.run(req).await {
            Ok(res) => res,
            Err(err) => self.boundary.recover(&err, method, &path),
        }
    }
}
