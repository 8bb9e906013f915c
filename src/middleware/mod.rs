//! Middleware layer.
//!
//! A middleware stage inspects (and may annotate) the request before the
//! route handler sees it. Each stage answers with a [`Flow`]:
//!
//! | Flow | Effect |
//! |---|---|
//! | `Continue` | the next stage (or the handler) runs |
//! | `Respond(res)` | short-circuit: `res` is the response, nothing else runs |
//! | `Fail(err)` | remaining stages are skipped; `err` goes to the error boundary |
//!
//! Stages are plain values in an ordered list, driven by the loop in
//! [`Chain::run`](crate::Chain::run). There is no `next` callback to forget to
//! call, and no way to produce two responses.
//!
//! Built-in stages:
//! - [`AuthGate`]: shared-secret header check
//! - [`Timestamp`]: records when the request arrived
//! - [`Trace`]: one log line per request

mod auth;
mod timestamp;
mod trace;

pub use auth::AuthGate;
pub use timestamp::{RequestTime, Timestamp};
pub use trace::Trace;

use crate::error::ApiError;
use crate::request::Request;
use crate::response::Response;

/// The outcome of one middleware stage.
#[derive(Debug)]
pub enum Flow {
    Continue,
    Respond(Response),
    Fail(ApiError),
}

/// A stage in a route's chain.
pub trait Middleware: Send + Sync + 'static {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn process(&self, req: &mut Request) -> Flow;
}

/// Any `Fn(&mut Request) -> Flow` is a middleware named `"fn"`.
impl<F> Middleware for F
where
    F: Fn(&mut Request) -> Flow + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        "fn"
    }

    fn process(&self, req: &mut Request) -> Flow {
        self(req)
    }
}
