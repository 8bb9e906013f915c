//! Incoming HTTP request type: the per-request context a chain works on.

use std::collections::HashMap;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Extensions, HeaderMap};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::method::Method;

/// An incoming HTTP request.
///
/// Owned by exactly one chain for its whole life. Middleware annotates it
/// through [`extensions_mut`](Request::extensions_mut); the handler reads
/// those annotations back with [`extensions`](Request::extensions).
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: HashMap<String, String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) extensions: Extensions,
}

impl Request {
    /// Builds a request for `target` (`/path` or `/path?query`).
    ///
    /// The server builds requests from hyper's parts; this constructor exists
    /// for driving a [`Service`](crate::Service) directly.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (target, HashMap::new()),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: HashMap::new(),
            extensions: Extensions::new(),
        }
    }

    /// Returns `None` for methods pinax does not route on.
    pub(crate) fn from_parts(parts: http::request::Parts, body: Bytes) -> Option<Self> {
        let method = Method::try_from(&parts.method).ok()?;
        Some(Self {
            method,
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(parse_query).unwrap_or_default(),
            headers: parts.headers,
            body,
            params: HashMap::new(),
            extensions: parts.extensions,
        })
    }

    /// Adds a header. Invalid names or values are dropped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and the matching content type.
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_header("content-type", "application/json")
            .with_body(value.to_string())
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn extensions(&self) -> &Extensions { &self.extensions }
    pub fn extensions_mut(&mut self) -> &mut Extensions { &mut self.extensions }

    /// Case-insensitive header lookup. Non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns a query-string parameter.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Deserialises the body as JSON. An empty body reads as `{}`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))
    }
}

// First occurrence of a key wins. Percent escapes and `+` are decoded.
fn parse_query(query: &str) -> HashMap<String, String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();
    let mut out = HashMap::new();
    for (k, v) in pairs {
        out.entry(k).or_insert(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize)]
    struct Login {
        username: Option<String>,
    }

    #[test]
    fn splits_path_and_query() {
        let req = Request::new(Method::Get, "/users/7?verbose=1&tag=a&tag=b&flag");
        assert_eq!(req.path(), "/users/7");
        assert_eq!(req.query("verbose"), Some("1"));
        assert_eq!(req.query("tag"), Some("a"));
        assert_eq!(req.query("flag"), Some(""));
        assert_eq!(req.query("missing"), None);
    }

    #[test]
    fn query_values_are_decoded() {
        let req = Request::new(Method::Get, "/users/1?name=a%20b&q=x+y&sym=%26%3D");
        assert_eq!(req.query("name"), Some("a b"));
        assert_eq!(req.query("q"), Some("x y"));
        assert_eq!(req.query("sym"), Some("&="));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::Get, "/").with_header("Authorization", "t0ken");
        assert_eq!(req.header("authorization"), Some("t0ken"));
        assert_eq!(req.header("AUTHORIZATION"), Some("t0ken"));
    }

    #[test]
    fn empty_body_reads_as_empty_object() {
        let req = Request::new(Method::Post, "/test-routes/login");
        let login: Login = req.json().unwrap();
        assert!(login.username.is_none());
    }

    #[test]
    fn malformed_body_is_a_bad_request() {
        let req = Request::new(Method::Post, "/users").with_body("{not json");
        let err = req.json::<Login>().err().unwrap();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
