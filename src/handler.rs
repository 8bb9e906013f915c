//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! A route table holds handlers of *different* types: plain `async fn`s,
//! closures that capture a store, and so on. Rust collections can only hold
//! one concrete type, so we hide each one behind a trait object
//! (`dyn ErasedHandler`) and store everything uniformly.
//!
//! ```text
//! async fn hello(req: Request) -> Result<Response, ApiError> { … }
//!        ↓ router.get("/", hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← stored as BoxedHandler
//!        ↓
//! handler.call(req)  at request time               ← one vtable dispatch
//!        ↓
//! Box::pin(async { hello(req).await.map(IntoResponse::into_response) })
//! ```
//!
//! Handlers return `Result`: the `Err` side is never turned into a response
//! here. It travels up the [`Chain`](crate::Chain) to the
//! [`ErrorBoundary`](crate::ErrorBoundary).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::ApiError;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── Internal types ────────────────────────────────────────────────────────────

/// What every handler and chain ultimately produces.
pub type HandlerResult = Result<Response, ApiError>;

/// A heap-allocated, type-erased future that resolves to a [`HandlerResult`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'static>>;

/// Internal dispatch interface.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` or closure with the shape:
///
/// ```text
/// async fn name(req: Request) -> Result<impl IntoResponse, ApiError>
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;
    use crate::method::Method;

    async fn teapot(_req: Request) -> Result<StatusCode, ApiError> {
        Ok(StatusCode::IM_A_TEAPOT)
    }

    #[tokio::test]
    async fn erases_async_fns_and_closures() {
        let handler = teapot.into_boxed_handler();
        let res = handler.call(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::IM_A_TEAPOT);

        let tag = Arc::new(String::from("captured"));
        let closure = move |_req: Request| {
            let tag = Arc::clone(&tag);
            async move { Ok::<_, ApiError>(tag.to_string()) }
        };
        let res = closure.into_boxed_handler().call(Request::new(Method::Get, "/")).await.unwrap();
        assert_eq!(res.body(), b"captured");
    }

    #[tokio::test]
    async fn errors_pass_through_untouched() {
        let failing = |_req: Request| async { Err::<Response, _>(ApiError::Internal("boom".into())) };
        let err = failing.into_boxed_handler().call(Request::new(Method::Get, "/")).await.unwrap_err();
        assert_eq!(err, ApiError::Internal("boom".into()));
    }
}
