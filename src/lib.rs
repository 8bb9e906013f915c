//! # pinax
//!
//! A small REST backend for two resources, users and posts, built on a
//! request pipeline you can read in one sitting:
//!
//! ```text
//! request ─► route lookup ─► middleware stages ─► handler ─► store
//!                                 │                  │
//!                                 └── Fail / Err ────┴──► error boundary ─► response
//! ```
//!
//! - Radix-tree routing per method via [`matchit`]
//! - Middleware as an ordered list of [`Middleware`] stages, each answering
//!   [`Flow::Continue`], [`Flow::Respond`] or [`Flow::Fail`]
//! - Stores injected as `Arc<dyn ResourceStore<R>>`: in-memory or a
//!   file-backed document collection
//! - One [`ErrorBoundary`], attached when the [`App`] is finished
//! - HTTP/1.1 and HTTP/2 via hyper, graceful shutdown on SIGTERM / Ctrl-C
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use pinax::{Config, Server, Stores, application};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), pinax::Error> {
//!     let config = Config::default();
//!     let stores = Stores::open(&config).await?;
//!     Server::bind(config.addr).serve(application(&config, stores)).await
//! }
//! ```

mod app;
mod boundary;
mod chain;
mod compose;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod config;
pub mod demo;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod resource;
pub mod store;

pub use app::{App, Service};
pub use boundary::{ErrorBoundary, FAILURE_MESSAGE};
pub use chain::{Chain, Stage};
pub use compose::{Stores, application};
pub use config::{Config, ConfigLoader};
pub use error::{ApiError, Error};
pub use handler::{Handler, HandlerResult};
pub use method::Method;
pub use middleware::{Flow, Middleware};
pub use request::Request;
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
