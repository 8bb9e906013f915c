//! The error boundary: the last stop for every failed request.
//!
//! Whatever a chain fails with (a store I/O error, a rejected body, a
//! handler bug surfaced as [`ApiError::Internal`]) ends up here exactly
//! once and leaves as a response.
//!
//! | Error class | Status | Body | Log |
//! |---|---|---|---|
//! | client (4xx) | the error's own | `{"message": …}` | `debug` |
//! | server (5xx) | 500 | `{"message": "Something went wrong!", "error": …}` | `error` |

use serde::Serialize;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::method::Method;
use crate::response::Response;

/// Fixed `message` of every 5xx envelope.
pub const FAILURE_MESSAGE: &str = "Something went wrong!";

const REDACTED: &str = "internal error";

#[derive(Serialize)]
struct Envelope<'a> {
    message: &'a str,
    error: &'a str,
}

/// Converts [`ApiError`]s into responses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErrorBoundary {
    redact: bool,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide the underlying description of server errors from clients.
    /// It is still logged.
    pub fn redacted(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    pub fn recover(&self, err: &ApiError, method: Method, path: &str) -> Response {
        let status = err.status();
        if err.is_client_error() {
            debug!(%method, path, status = status.as_u16(), "{err}");
            return Response::message(status, &err.to_string());
        }

        error!(%method, path, error = %err, "request failed");
        let description = err.to_string();
        let envelope = Envelope {
            message: FAILURE_MESSAGE,
            error: if self.redact { REDACTED } else { &description },
        };
        Response::builder().status(status).json(&envelope)
    }
}
