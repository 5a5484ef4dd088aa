//! Handler trait for request processing.
//!
//! A [`Handler`] turns a [`Request`] into a [`Response`]. Handlers are
//! stored type-erased in the route index, so the trait is object safe and
//! returns a boxed future.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A request handler.
///
/// Most handlers are written as async closures and wrapped with
/// [`handler_fn`]; implement the trait directly for handlers that carry
/// their own state.
///
/// # Example
///
/// ```rust
/// use ariadne_core::{handler_fn, Request};
///
/// let get_user = handler_fn(|req: Request| async move {
///     format!("user {}", req.param("id").unwrap_or("unknown"))
/// });
/// # let _ = get_user;
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handles a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] when the handler fails or its result cannot be
    /// converted into a response.
    fn call(&self, request: Request) -> BoxFuture<'static, Result<Response, Error>>;
}

/// A shared, type-erased handler.
pub type BoxHandler = Arc<dyn Handler>;

/// A function-based handler wrapper.
///
/// Created by [`handler_fn`].
pub struct HandlerFn<F> {
    func: F,
}

impl<F> std::fmt::Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").finish_non_exhaustive()
    }
}

/// Wraps an async function as a [`Handler`].
///
/// The function's output may be any [`IntoResponse`] value, including a
/// `Result` whose error converts into [`Error`].
pub fn handler_fn<F, Fut, R>(func: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    HandlerFn { func }
}

impl<F, Fut, R> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, request: Request) -> BoxFuture<'static, Result<Response, Error>> {
        let fut = (self.func)(request);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_router::Params;
    use bytes::Bytes;
    use http::StatusCode;

    fn request() -> Request {
        let raw = http::Request::builder()
            .uri("/users/9")
            .body(Bytes::new())
            .unwrap();
        let mut params = Params::new();
        params.push("id", "9");
        Request::from_http(raw, params)
    }

    #[tokio::test]
    async fn test_handler_fn_reads_params() {
        let handler = handler_fn(|req: Request| async move {
            format!("user {}", req.param("id").unwrap_or_default())
        });

        let response = handler.call(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_handler_fn_error() {
        let handler = handler_fn(|_req: Request| async move {
            Err::<&'static str, _>(anyhow::anyhow!("lookup failed"))
        });

        let err = handler.call(request()).await.unwrap_err();
        assert!(matches!(err, Error::Internal { .. }));
    }

    #[test]
    fn test_handler_is_object_safe() {
        let handler: BoxHandler = Arc::new(handler_fn(|_req: Request| async { "ok" }));
        let response = tokio_test::block_on(handler.call(request())).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
