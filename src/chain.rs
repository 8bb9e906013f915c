//! Ordered middleware stages ending in a handler.

use std::sync::Arc;

use tracing::trace;

use crate::handler::{BoxedHandler, HandlerResult};
use crate::middleware::{Flow, Middleware};
use crate::request::Request;

/// A shared middleware stage.
pub type Stage = Arc<dyn Middleware>;

/// One route's pipeline: stages in registration order, then the handler.
#[derive(Clone)]
pub struct Chain {
    stages: Vec<Stage>,
    handler: BoxedHandler,
}

impl Chain {
    pub(crate) fn new(stages: Vec<Stage>, handler: BoxedHandler) -> Self {
        Self { stages, handler }
    }

    /// Returns a copy of this chain with `outer` running before its own stages.
    pub(crate) fn prefixed(&self, outer: &[Stage]) -> Self {
        let stages = outer.iter().chain(&self.stages).cloned().collect();
        Self { stages, handler: Arc::clone(&self.handler) }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Runs the request through every stage, then the handler.
    ///
    /// The first `Respond` or `Fail` ends the run; later stages and the
    /// handler are skipped.
    pub async fn run(&self, mut req: Request) -> HandlerResult {
        for stage in &self.stages {
            match stage.process(&mut req) {
                Flow::Continue => {}
                Flow::Respond(res) => {
                    trace!(stage = stage.name(), "short-circuited");
                    return Ok(res);
                }
                Flow::Fail(err) => {
                    trace!(stage = stage.name(), "failed");
                    return Err(err);
                }
            }
        }
        self.handler.call(req).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use http::StatusCode;

    use super::*;
    use crate::error::ApiError;
    use crate::handler::Handler;
    use crate::method::Method;
    use crate::response::Response;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str, flow: fn() -> Flow) -> Stage {
        let log = Arc::clone(log);
        Arc::new(move |_req: &mut Request| {
            log.lock().unwrap().push(tag);
            flow()
        })
    }

    fn handler(log: &Arc<Mutex<Vec<&'static str>>>) -> BoxedHandler {
        let log = Arc::clone(log);
        (move |_req: Request| {
            log.lock().unwrap().push("handler");
            async { Ok::<_, ApiError>(Response::text("done")) }
        })
        .into_boxed_handler()
    }

    #[tokio::test]
    async fn runs_stages_in_order_then_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new(
            vec![recorder(&log, "a", || Flow::Continue), recorder(&log, "b", || Flow::Continue)],
            handler(&log),
        );
        let res = chain.run(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(res.body(), b"done");
        assert_eq!(*log.lock().unwrap(), ["a", "b", "handler"]);
    }

    #[tokio::test]
    async fn respond_short_circuits() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new(
            vec![
                recorder(&log, "gate", || Flow::Respond(Response::status(StatusCode::FORBIDDEN))),
                recorder(&log, "after", || Flow::Continue),
            ],
            handler(&log),
        );
        let res = chain.run(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(*log.lock().unwrap(), ["gate"]);
    }

    #[tokio::test]
    async fn fail_skips_the_rest() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = Chain::new(
            vec![
                recorder(&log, "broken", || Flow::Fail(ApiError::Internal("stage".into()))),
                recorder(&log, "after", || Flow::Continue),
            ],
            handler(&log),
        );
        let err = chain.run(Request::new(Method::Get, "/")).await.unwrap_err();
        assert_eq!(err, ApiError::Internal("stage".into()));
        assert_eq!(*log.lock().unwrap(), ["broken"]);
    }

    #[tokio::test]
    async fn prefixed_runs_outer_stages_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let inner = Chain::new(vec![recorder(&log, "inner", || Flow::Continue)], handler(&log));
        let outer = inner.prefixed(&[recorder(&log, "outer", || Flow::Continue)]);
        assert_eq!(outer.len(), 2);
        outer.run(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(*log.lock().unwrap(), ["outer", "inner", "handler"]);
    }
}
