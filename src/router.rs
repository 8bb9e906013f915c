//! Route registration and the radix-tree lookup table.
//!
//! A [`Router`] is a list of `(method, path, chain)` registrations plus the
//! stages it applies to all of them. Routers nest: the
//! [`App`](crate::App) mounts them under prefixes and compiles everything into
//! one [`RouteTable`]: one `matchit` tree per method, O(path-length) lookup.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::chain::{Chain, Stage};
use crate::handler::Handler;
use crate::method::Method;
use crate::middleware::Middleware;

struct Route {
    method: Method,
    path: String,
    chain: Chain,
}

/// A group of routes sharing router-wide middleware.
///
/// Each call returns `self` so registrations chain naturally.
#[derive(Default)]
pub struct Router {
    stages: Vec<Stage>,
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stage that runs before every route of this router, including
    /// routes registered earlier. Layers run in the order they were added.
    pub fn layer(mut self, stage: impl Middleware) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use pinax::{ApiError, Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Result<Response, ApiError> { Ok(Response::text("")) }
    /// # async fn create_user(_: Request) -> Result<Response, ApiError> { Ok(Response::text("")) }
    /// Router::new()
    ///     .on(Method::Get,  "/users/{id}", get_user)
    ///     .on(Method::Post, "/users",      create_user);
    /// ```
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.on_with(method, path, Vec::new(), handler)
    }

    /// Register a handler behind route-specific stages, run in order after
    /// the router-wide ones.
    pub fn on_with(mut self, method: Method, path: &str, stages: Vec<Stage>, handler: impl Handler) -> Self {
        self.routes.push(Route {
            method,
            path: path.to_owned(),
            chain: Chain::new(stages, handler.into_boxed_handler()),
        });
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Mounts every route of `child` under `prefix`. The child's own layers
    /// stay scoped to the child's routes.
    pub fn nest(mut self, prefix: &str, child: Router) -> Self {
        for route in child.flatten() {
            self.routes.push(Route {
                path: join(prefix, &route.path),
                ..route
            });
        }
        self
    }

    /// Routes with this router's layers folded into their chains.
    fn flatten(self) -> impl Iterator<Item = Route> {
        let stages = self.stages;
        self.routes.into_iter().map(move |route| Route {
            chain: route.chain.prefixed(&stages),
            ..route
        })
    }

    /// Compiles the registrations into a lookup table.
    ///
    /// # Panics
    ///
    /// Panics on an invalid or conflicting path pattern. Routes are fixed at
    /// startup, so this surfaces before the server accepts anything.
    pub(crate) fn into_table(self) -> RouteTable {
        let mut trees: HashMap<Method, MatchitRouter<Arc<Chain>>> = HashMap::new();
        for route in self.flatten() {
            trees
                .entry(route.method)
                .or_default()
                .insert(route.path.as_str(), Arc::new(route.chain))
                .unwrap_or_else(|e| panic!("invalid route `{} {}`: {e}", route.method, route.path));
        }
        RouteTable { trees }
    }
}

/// `"/users" + "/"` is `"/users"`; `"/users" + "/{id}"` is `"/users/{id}"`.
fn join(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match path.trim_start_matches('/') {
        "" if prefix.is_empty() => "/".to_owned(),
        "" => prefix.to_owned(),
        rest => format!("{prefix}/{rest}"),
    }
}

/// The compiled routing table.
pub(crate) struct RouteTable {
    trees: HashMap<Method, MatchitRouter<Arc<Chain>>>,
}

impl RouteTable {
    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(Arc<Chain>, HashMap<String, String>)> {
        let tree = self.trees.get(&method)?;
        // `/users/` serves the same route as `/users`.
        let matched = match tree.at(path) {
            Ok(matched) => matched,
            Err(_) if path.len() > 1 && path.ends_with('/') => {
                tree.at(&path[..path.len() - 1]).ok()?
            }
            Err(_) => return None,
        };
        let chain = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((chain, params))
    }
}
