//! Per-request dispatch.
//!
//! ```text
//! request ─▶ route lookup ──────────┐
//!        └─▶ middleware matching ───┴─▶ compose ─▶ run ─▶ response slot
//! ```
//!
//! Lookup failure is not an error: the not-found handler becomes the
//! terminal and path-matched middleware still runs around it. Errors and
//! panics from anywhere in the chain are caught here, once, and replaced
//! by the fixed internal-error response.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use ariadne_core::{responses, Error, Request, RequestId, Response};
use ariadne_middleware::{compose, Context, Endpoint};
use ariadne_router::Params;
use ariadne_telemetry::metrics::{record_failure, record_request};
use ariadne_telemetry::{log_dispatch_complete, log_dispatch_error, InFlightGuard};
use bytes::Bytes;
use futures_util::FutureExt;
use tracing::Instrument;

use crate::app::App;

impl App {
    /// Dispatches one request through the matched middleware and handler.
    ///
    /// Never fails: unmatched paths produce the not-found response and
    /// failures produce the internal-error response.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ariadne_core::{handler_fn, Request};
    /// use ariadne_server::App;
    /// use bytes::Bytes;
    ///
    /// # tokio_test::block_on(async {
    /// let mut app = App::new();
    /// app.get("/users/:id", handler_fn(|req: Request| async move {
    ///     req.param("id").unwrap_or_default().to_string()
    /// })).unwrap();
    ///
    /// let request = http::Request::get("/users/42").body(Bytes::new()).unwrap();
    /// let response = app.dispatch(request).await;
    /// assert_eq!(response.status(), http::StatusCode::OK);
    /// # });
    /// ```
    pub async fn dispatch(&self, request: http::Request<Bytes>) -> Response {
        let request_id = RequestId::new();
        let method = request.method().clone();
        let path = self.routes.normalize(request.uri().path()).to_string();

        let span = tracing::info_span!(
            "dispatch",
            request_id = %request_id,
            http.method = %method,
            http.path = %path,
        );

        async move {
            let _in_flight = InFlightGuard::new();
            let started = Instant::now();

            let outcome = AssertUnwindSafe(self.run_chain(request, request_id))
                .catch_unwind()
                .await;

            let response = match outcome {
                Ok(Ok(response)) => response,
                Ok(Err(error)) => {
                    log_dispatch_error!(request_id, error);
                    record_failure("error");
                    responses::internal_error()
                }
                Err(payload) => {
                    let error = Error::panicked(&*payload);
                    log_dispatch_error!(request_id, error);
                    record_failure("panic");
                    responses::internal_error()
                }
            };

            let elapsed = started.elapsed();
            record_request(method.as_str(), response.status().as_u16(), elapsed);
            log_dispatch_complete!(request_id, response.status().as_u16(), elapsed.as_millis() as u64);

            response
        }
        .instrument(span)
        .await
    }

    async fn run_chain(&self, request: http::Request<Bytes>, request_id: RequestId) -> Result<Response, Error> {
        let path = request.uri().path().to_string();

        let (handler, params) = match self.routes.match_route(request.method(), &path) {
            Some(found) => (Arc::clone(found.handler()), found.params),
            None => {
                tracing::debug!("no route matched");
                (Arc::clone(&self.not_found), Params::new())
            }
        };

        let mut chain = self.middleware.matching(&path);
        chain.push(Arc::new(Endpoint::new(handler)));

        let mut ctx = Context::with_request_id(
            Request::from_http(request, params),
            Arc::clone(&self.env),
            request_id,
        );
        compose(&chain).run(&mut ctx).await?;

        // A middleware that short-circuits without a response yields 404.
        Ok(ctx.take_response().unwrap_or_else(responses::not_found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_core::handler_fn;
    use http::StatusCode;

    fn get(uri: &str) -> http::Request<Bytes> {
        http::Request::get(uri).body(Bytes::new()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_matched_route() {
        let mut app = App::new();
        app.get("/ping", handler_fn(|_req: Request| async { "pong" }))
            .unwrap();

        let response = app.dispatch(get("/ping")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dispatch_unmatched_method_is_not_found() {
        let mut app = App::new();
        app.post("/ping", handler_fn(|_req: Request| async { "pong" }))
            .unwrap();

        let response = app.dispatch(get("/ping")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_custom_not_found() {
        let mut app = App::new();
        app.not_found(handler_fn(|_req: Request| async {
            (StatusCode::GONE, "gone")
        }));

        let response = app.dispatch(get("/anything")).await;
        assert_eq!(response.status(), StatusCode::GONE);
    }

    #[tokio::test]
    async fn test_short_circuit_without_response_is_not_found() {
        let mut app = App::new();
        app.get("/ping", handler_fn(|_req: Request| async { "pong" }))
            .unwrap();
        app.use_fn("/*", "drop", |_ctx, _next| Box::pin(async { Ok(()) }))
            .unwrap();

        let response = app.dispatch(get("/ping")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_middleware_reads_state() {
        struct Greeting(&'static str);

        let mut app = App::new().with_state(Greeting("hello"));
        app.use_fn("/*", "greet", |ctx, next| {
            Box::pin(async move {
                next.run(ctx).await?;
                let greeting = ctx.state::<Greeting>().map_or("", |g| g.0);
                if let Some(response) = ctx.response_mut() {
                    response
                        .headers_mut()
                        .insert("x-greeting", http::HeaderValue::from_static(greeting));
                }
                Ok(())
            })
        })
        .unwrap();

        let response = app.dispatch(get("/missing")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["x-greeting"], "hello");
    }
}
