use tracing::info;

use super::{Flow, Middleware, RequestTime};
use crate::request::Request;

/// Logs method, path and, when [`Timestamp`](super::Timestamp) ran first,
/// the receipt time of every request that reaches it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl Middleware for Trace {
    fn name(&self) -> &'static str {
        "trace"
    }

    fn process(&self, req: &mut Request) -> Flow {
        let received = req.extensions().get::<RequestTime>().map(RequestTime::to_iso8601);
        info!(
            method = %req.method(),
            path = req.path(),
            received_at = received.as_deref().unwrap_or("-"),
            "request"
        );
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::middleware::Timestamp;

    #[test]
    fn continues_with_or_without_a_stamp() {
        let mut bare = Request::new(Method::Get, "/users");
        assert!(matches!(Trace.process(&mut bare), Flow::Continue));

        let mut stamped = Request::new(Method::Get, "/users");
        Timestamp.process(&mut stamped);
        assert!(matches!(Trace.process(&mut stamped), Flow::Continue));
        assert!(stamped.extensions().get::<RequestTime>().is_some());
    }
}
