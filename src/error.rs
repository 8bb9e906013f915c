//! Error types.
//!
//! Two families live here. [`ApiError`] is what a request can fail with; the
//! [`ErrorBoundary`](crate::ErrorBoundary) turns it into a response. [`Error`]
//! surfaces infrastructure failures: loading config, opening a store, binding
//! to a port.

use http::StatusCode;
use thiserror::Error;

use crate::config::ConfigError;
use crate::store::StoreError;

/// A request-level failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Required input missing or empty.
    #[error("{0}")]
    Validation(String),

    /// Input that could not be parsed at all (malformed JSON, bad id).
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// A collaborator (the document store) failed.
    #[error("{0}")]
    Upstream(String),

    /// Anything else that went wrong inside a handler.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Upstream(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// `true` for errors the caller caused (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(msg) => Self::Validation(msg),
            StoreError::NotFound(msg) => Self::NotFound(msg),
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// The error type returned by pinax's fallible startup operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("store: {0}")]
    Store(#[from] StoreError),
}
