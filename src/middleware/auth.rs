//! Static shared-secret authentication.

use http::StatusCode;
use tracing::debug;

use super::{Flow, Middleware};
use crate::request::Request;
use crate::response::Response;

pub const DEFAULT_HEADER: &str = "authorization";

/// Lets a request through only if `header` carries exactly `token`.
///
/// No sessions, no expiry, no scheme prefix: the header value is compared to
/// the token byte for byte. A missing header is a mismatch.
#[derive(Clone, Debug)]
pub struct AuthGate {
    header: String,
    token: String,
}

impl AuthGate {
    /// Checks the `authorization` header.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_header(DEFAULT_HEADER, token)
    }

    pub fn with_header(header: impl Into<String>, token: impl Into<String>) -> Self {
        Self { header: header.into(), token: token.into() }
    }
}

impl Middleware for AuthGate {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn process(&self, req: &mut Request) -> Flow {
        if req.header(&self.header) == Some(self.token.as_str()) {
            return Flow::Continue;
        }
        debug!(path = req.path(), "rejected: invalid token");
        Flow::Respond(Response::message(StatusCode::FORBIDDEN, "Forbidden: Invalid token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;

    fn outcome(gate: &AuthGate, req: Request) -> Option<StatusCode> {
        let mut req = req;
        match gate.process(&mut req) {
            Flow::Continue => None,
            Flow::Respond(res) => Some(res.status_code()),
            Flow::Fail(e) => panic!("gate never fails: {e}"),
        }
    }

    #[test]
    fn exact_token_continues() {
        let gate = AuthGate::new("mysecrettoken");
        let req = Request::new(Method::Get, "/").with_header("authorization", "mysecrettoken");
        assert_eq!(outcome(&gate, req), None);
    }

    #[test]
    fn anything_else_is_forbidden() {
        let gate = AuthGate::new("mysecrettoken");
        for value in ["", "mysecrettoken ", "MYSECRETTOKEN", "Bearer mysecrettoken"] {
            let req = Request::new(Method::Get, "/").with_header("authorization", value);
            assert_eq!(outcome(&gate, req), Some(StatusCode::FORBIDDEN), "value {value:?}");
        }
        assert_eq!(outcome(&gate, Request::new(Method::Get, "/")), Some(StatusCode::FORBIDDEN));
    }

    #[test]
    fn custom_header() {
        let gate = AuthGate::with_header("x-api-key", "k");
        let ok = Request::new(Method::Get, "/").with_header("X-Api-Key", "k");
        let wrong_header = Request::new(Method::Get, "/").with_header("authorization", "k");
        assert_eq!(outcome(&gate, ok), None);
        assert_eq!(outcome(&gate, wrong_header), Some(StatusCode::FORBIDDEN));
    }
}
