//! Demonstration routes: the landing text, a token-protected route with its
//! login, and a route that always fails.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::chain::Stage;
use crate::error::ApiError;
use crate::method::Method;
use crate::middleware::AuthGate;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

const ADMIN_USER: &str = "admin";
const ADMIN_PASSWORD: &str = "password";

pub async fn index(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::text("Hello World from backend, Holaaaa Amigo!"))
}

/// Fails on every call; the error boundary answers.
pub async fn fail(_req: Request) -> Result<Response, ApiError> {
    Err(ApiError::Internal("this route always fails".to_owned()))
}

#[derive(Deserialize)]
struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

/// Routes meant to be nested under `/test-routes`:
///
/// - `GET /valid-route`: behind `gate`
/// - `GET /normal-route`: open
/// - `POST /login`: trades the fixed admin credentials for `gate`'s token
pub fn test_routes(gate: AuthGate, token: &str) -> Router {
    let token: Arc<str> = Arc::from(token);
    Router::new()
        .on_with(Method::Get, "/valid-route", vec![Arc::new(gate) as Stage], protected)
        .get("/normal-route", normal)
        .post("/login", move |req: Request| login(req, Arc::clone(&token)))
}

async fn protected(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::json(&json!({ "message": "You have accessed a protected route!" })))
}

async fn normal(_req: Request) -> Result<Response, ApiError> {
    Ok(Response::json(&json!({ "message": "This is a normal route without authentication." })))
}

async fn login(req: Request, token: Arc<str>) -> Result<Response, ApiError> {
    let creds: Credentials = req.json()?;
    if creds.username.as_deref() == Some(ADMIN_USER) && creds.password.as_deref() == Some(ADMIN_PASSWORD) {
        return Ok(Response::json(&json!({ "token": &*token })));
    }
    Err(ApiError::Unauthorized("Unauthorized: Invalid credentials".to_owned()))
}
