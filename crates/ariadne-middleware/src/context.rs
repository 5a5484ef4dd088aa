//! Per-dispatch context.
//!
//! A [`Context`] is created once per dispatch, threaded through every
//! middleware and the terminal endpoint, and discarded when the chain
//! completes. It is never shared between concurrent dispatches.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ariadne_core::{Environment, Request, RequestId, Response};

/// Mutable state of one dispatch.
///
/// Holds the request view, the shared environment and the single response
/// slot the endpoint fills. Middleware may inspect or replace the response
/// on the way out, and pass data to inner middleware through typed
/// extensions.
#[derive(Debug)]
pub struct Context {
    request: Request,
    env: Arc<Environment>,
    response: Option<Response>,
    request_id: RequestId,
    started_at: Instant,
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Context {
    /// Creates a context for `request` with a fresh request ID.
    #[must_use]
    pub fn new(request: Request, env: Arc<Environment>) -> Self {
        Self::with_request_id(request, env, RequestId::new())
    }

    /// Creates a context with a caller-supplied request ID.
    #[must_use]
    pub fn with_request_id(request: Request, env: Arc<Environment>, request_id: RequestId) -> Self {
        Self {
            request,
            env,
            response: None,
            request_id,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request being dispatched.
    #[must_use]
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Returns the shared application environment.
    #[must_use]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Shorthand for `ctx.env().get::<T>()`.
    #[must_use]
    pub fn state<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.env.get::<T>()
    }

    /// Returns the response, if one has been stored.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Returns the response for modification, if one has been stored.
    pub fn response_mut(&mut self) -> Option<&mut Response> {
        self.response.as_mut()
    }

    /// Stores `response`, replacing any earlier one.
    pub fn set_response(&mut self, response: Response) {
        self.response = Some(response);
    }

    /// Removes and returns the response.
    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns when the dispatch started.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the time elapsed since the dispatch started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns a typed extension value for modification.
    pub fn get_extension_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extensions
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut::<T>())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast::<T>().ok())
            .map(|v| *v)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ariadne_core::IntoResponse;
    use ariadne_router::Params;
    use bytes::Bytes;

    pub(crate) fn context(uri: &str) -> Context {
        let raw = http::Request::builder().uri(uri).body(Bytes::new()).unwrap();
        Context::new(
            Request::from_http(raw, Params::new()),
            Arc::new(Environment::new()),
        )
    }

    #[test]
    fn test_context_new() {
        let ctx = context("/users");
        assert_eq!(ctx.request().path(), "/users");
        assert!(ctx.response().is_none());
        assert!(ctx.env().is_empty());
    }

    #[test]
    fn test_response_slot() {
        let mut ctx = context("/");
        ctx.set_response("first".into_response().unwrap());
        assert!(ctx.response().is_some());

        let status = ctx.response_mut().map(|r| r.status_mut());
        if let Some(status) = status {
            *status = http::StatusCode::ACCEPTED;
        }
        let response = ctx.take_response().unwrap();
        assert_eq!(response.status(), http::StatusCode::ACCEPTED);
        assert!(ctx.response().is_none());
    }

    #[test]
    fn test_state_lookup() {
        let raw = http::Request::builder().uri("/").body(Bytes::new()).unwrap();
        let mut env = Environment::new();
        env.insert(String::from("orders-db"));
        let ctx = Context::new(Request::from_http(raw, Params::new()), Arc::new(env));

        assert_eq!(ctx.state::<String>().map(String::as_str), Some("orders-db"));
        assert!(ctx.state::<u64>().is_none());
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, PartialEq)]
        struct UserId(u64);

        let mut ctx = context("/");
        ctx.set_extension(UserId(7));
        assert_eq!(ctx.get_extension::<UserId>(), Some(&UserId(7)));

        if let Some(id) = ctx.get_extension_mut::<UserId>() {
            id.0 = 8;
        }
        assert_eq!(ctx.remove_extension::<UserId>(), Some(UserId(8)));
        assert!(ctx.get_extension::<UserId>().is_none());
    }

    #[test]
    fn test_request_ids_differ_per_context() {
        assert_ne!(context("/").request_id(), context("/").request_id());
    }
}
