//! Application: route index, middleware registry and shared environment.
//!
//! Everything is registered up front through `&mut App`; dispatch only
//! needs `&App`, so a finished application is shared across connections
//! behind an `Arc` without locking.

use std::sync::Arc;

use ariadne_core::{handler_fn, responses, BoxHandler, Environment, Error, Handler};
use ariadne_middleware::{from_fn, BoxFuture, Context, Middleware, MiddlewareRegistry, Next};
use ariadne_router::{RouteMatch, Router};
use http::Method;

/// A routing application.
///
/// # Example
///
/// ```rust
/// use ariadne_core::{handler_fn, Request};
/// use ariadne_server::App;
///
/// # fn main() -> Result<(), ariadne_core::Error> {
/// let mut app = App::new();
/// app.get("/health", handler_fn(|_req: Request| async { "ok" }))?;
///
/// let mut api = app.route("/api");
/// api.get("/users/:id", handler_fn(|req: Request| async move {
///     format!("user {}", req.param("id").unwrap_or_default())
/// }))?;
///
/// app.use_fn("/api/*", "audit", |ctx, next| {
///     Box::pin(async move {
///         tracing::info!(path = ctx.request().path(), "api call");
///         next.run(ctx).await
///     })
/// })?;
/// # Ok(())
/// # }
/// ```
pub struct App {
    pub(crate) routes: Router<BoxHandler>,
    pub(crate) middleware: MiddlewareRegistry,
    pub(crate) env: Arc<Environment>,
    pub(crate) not_found: BoxHandler,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates an empty, non-strict application.
    #[must_use]
    pub fn new() -> Self {
        Self::strict(false)
    }

    /// Creates an empty application in which a trailing `/` is significant
    /// when `strict` is true, for routes and middleware alike.
    ///
    /// Patterns are normalized as they are registered, so strictness is
    /// chosen here and cannot change afterwards.
    #[must_use]
    pub fn strict(strict: bool) -> Self {
        Self {
            routes: Router::strict(strict),
            middleware: MiddlewareRegistry::strict(strict),
            env: Arc::new(Environment::new()),
            not_found: Arc::new(handler_fn(|_req| async { responses::not_found() })),
        }
    }

    /// Returns true if trailing separators are significant.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.routes.is_strict()
    }

    /// Adds a value to the environment shared by every dispatch.
    ///
    /// Read it back with [`Context::state`].
    #[must_use]
    pub fn with_state<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        Arc::make_mut(&mut self.env).insert(value);
        self
    }

    /// Returns the shared environment.
    #[must_use]
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Registers `handler` for a method token and a path pattern.
    ///
    /// The method is case-insensitive; `"ALL"` serves every method.
    pub fn add<H: Handler>(
        &mut self,
        method: &str,
        pattern: &str,
        handler: H,
    ) -> Result<&mut Self, Error> {
        self.routes
            .add(method, pattern, Arc::new(handler))
            .map_err(|e| Error::registration(pattern, e))?;
        tracing::debug!(method, pattern, "route registered");
        Ok(self)
    }

    /// Registers several handlers under one method and pattern.
    ///
    /// All of them are stored in order, but dispatch only ever invokes the
    /// first one.
    pub fn add_all<I>(&mut self, method: &str, pattern: &str, handlers: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        self.routes
            .add_all(method, pattern, handlers)
            .map_err(|e| Error::registration(pattern, e))?;
        tracing::debug!(method, pattern, "route registered");
        Ok(self)
    }

    /// Registers a `GET` route.
    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("GET", pattern, handler)
    }

    /// Registers a `POST` route.
    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("POST", pattern, handler)
    }

    /// Registers a `PUT` route.
    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("PUT", pattern, handler)
    }

    /// Registers a `PATCH` route.
    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("PATCH", pattern, handler)
    }

    /// Registers a `DELETE` route.
    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("DELETE", pattern, handler)
    }

    /// Registers a route serving every method.
    pub fn all<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("ALL", pattern, handler)
    }

    /// Returns a view that prefixes every pattern registered through it.
    ///
    /// The view writes into this application's indices; nothing is copied.
    pub fn route(&mut self, prefix: &str) -> Scope<'_> {
        Scope {
            app: self,
            prefix: join_prefix("", prefix),
        }
    }

    /// Registers middleware for every request path matching `pattern`,
    /// whatever its method and whether or not a route exists.
    ///
    /// Middleware runs in registration order. Use `/*` to cover a subtree.
    pub fn use_middleware<M: Middleware>(
        &mut self,
        pattern: &str,
        middleware: M,
    ) -> Result<&mut Self, Error> {
        let name = middleware.name();
        self.middleware
            .add(pattern, Arc::new(middleware))
            .map_err(|e| Error::registration(pattern, e))?;
        tracing::debug!(pattern, middleware = name, "middleware registered");
        Ok(self)
    }

    /// Registers an async closure `(ctx, next)` as middleware.
    pub fn use_fn<F>(&mut self, pattern: &str, name: &'static str, func: F) -> Result<&mut Self, Error>
    where
        F: for<'a> Fn(&'a mut Context, Next<'a>) -> BoxFuture<'a, Result<(), Error>>
            + Send
            + Sync
            + 'static,
    {
        self.use_middleware(pattern, from_fn(name, func))
    }

    /// Replaces the handler used when no route matches.
    pub fn not_found<H: Handler>(&mut self, handler: H) -> &mut Self {
        self.not_found = Arc::new(handler);
        self
    }

    /// Looks up the route for `method` and `path` without dispatching.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, BoxHandler>> {
        self.routes.match_route(method, path)
    }

    /// Returns the route index.
    #[must_use]
    pub fn routes(&self) -> &Router<BoxHandler> {
        &self.routes
    }

    /// Returns the middleware registry.
    #[must_use]
    pub fn middleware(&self) -> &MiddlewareRegistry {
        &self.middleware
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.routes.len())
            .field("middleware", &self.middleware)
            .field("env", &self.env)
            .field("strict", &self.routes.is_strict())
            .finish_non_exhaustive()
    }
}

/// A prefixed registration view over an [`App`].
///
/// Created by [`App::route`]; nested scopes concatenate prefixes.
#[derive(Debug)]
pub struct Scope<'a> {
    app: &'a mut App,
    prefix: String,
}

impl Scope<'_> {
    /// Returns this scope's prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registers `handler` under `prefix + pattern`.
    pub fn add<H: Handler>(&mut self, method: &str, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        let full = join_paths(&self.prefix, pattern);
        self.app.add(method, &full, handler)?;
        Ok(self)
    }

    /// Registers several handlers under `prefix + pattern`.
    pub fn add_all<I>(&mut self, method: &str, pattern: &str, handlers: I) -> Result<&mut Self, Error>
    where
        I: IntoIterator<Item = BoxHandler>,
    {
        let full = join_paths(&self.prefix, pattern);
        self.app.add_all(method, &full, handlers)?;
        Ok(self)
    }

    /// Registers a `GET` route.
    pub fn get<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("GET", pattern, handler)
    }

    /// Registers a `POST` route.
    pub fn post<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("POST", pattern, handler)
    }

    /// Registers a `PUT` route.
    pub fn put<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("PUT", pattern, handler)
    }

    /// Registers a `PATCH` route.
    pub fn patch<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("PATCH", pattern, handler)
    }

    /// Registers a `DELETE` route.
    pub fn delete<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("DELETE", pattern, handler)
    }

    /// Registers a route serving every method.
    pub fn all<H: Handler>(&mut self, pattern: &str, handler: H) -> Result<&mut Self, Error> {
        self.add("ALL", pattern, handler)
    }

    /// Registers middleware under `prefix + pattern`.
    pub fn use_middleware<M: Middleware>(&mut self, pattern: &str, middleware: M) -> Result<&mut Self, Error> {
        let full = join_paths(&self.prefix, pattern);
        self.app.use_middleware(&full, middleware)?;
        Ok(self)
    }

    /// Returns a nested scope with `prefix` appended to this one's.
    pub fn route(&mut self, prefix: &str) -> Scope<'_> {
        Scope {
            prefix: join_prefix(&self.prefix, prefix),
            app: &mut *self.app,
        }
    }
}

/// Joins a prefix and a pattern with exactly one `/` between them.
///
/// The result always starts with `/`; an empty or `/` pattern yields the
/// prefix itself.
pub(crate) fn join_paths(prefix: &str, pattern: &str) -> String {
    let head = prefix.trim_end_matches('/');
    let tail = pattern.trim_start_matches('/');

    let mut joined = String::with_capacity(head.len() + tail.len() + 2);
    if !head.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(head);
    if !tail.is_empty() {
        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(tail);
    }
    joined
}

/// Joins like [`join_paths`] but drops trailing separators, keeping a
/// lone `/`, so the result can be stored as a scope prefix.
fn join_prefix(prefix: &str, pattern: &str) -> String {
    let joined = join_paths(prefix, pattern);
    match joined.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariadne_core::Request;

    fn ok() -> impl Handler {
        handler_fn(|_req: Request| async { "ok" })
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("", "/users"), "/users");
        assert_eq!(join_paths("/api", "/users"), "/api/users");
        assert_eq!(join_paths("/api/", "users"), "/api/users");
        assert_eq!(join_paths("api", "//users"), "/api/users");
        assert_eq!(join_paths("/api", "/"), "/api");
        assert_eq!(join_paths("/", "/users/:id/"), "/users/:id/");
    }

    #[test]
    fn test_join_prefix() {
        assert_eq!(join_prefix("", "/api/"), "/api");
        assert_eq!(join_prefix("", "/"), "/");
        assert_eq!(join_prefix("", "//"), "/");
        assert_eq!(join_prefix("/api", "v2//"), "/api/v2");
        assert_eq!(join_prefix("/", ""), "/");
    }

    #[test]
    fn test_root_scope_registers_plain_paths() {
        let mut app = App::new();
        {
            let mut root = app.route("/");
            assert_eq!(root.prefix(), "/");
            root.get("/health", ok()).unwrap();
        }
        assert!(app.match_route(&Method::GET, "/health").is_some());
    }

    #[test]
    fn test_add_and_match() {
        let mut app = App::new();
        app.get("/users/:id", ok()).unwrap();

        let m = app.match_route(&Method::GET, "/users/7").unwrap();
        assert_eq!(m.params.get("id"), Some("7"));
        assert!(app.match_route(&Method::POST, "/users/7").is_none());
    }

    #[test]
    fn test_shorthands_register_methods() {
        let mut app = App::new();
        app.post("/a", ok()).unwrap();
        app.put("/a", ok()).unwrap();
        app.patch("/a", ok()).unwrap();
        app.delete("/a", ok()).unwrap();
        app.all("/b", ok()).unwrap();

        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE] {
            assert!(app.match_route(&method, "/a").is_some(), "{method}");
        }
        assert!(app.match_route(&Method::GET, "/a").is_none());
        assert!(app.match_route(&Method::OPTIONS, "/b").is_some());
    }

    #[test]
    fn test_registration_error() {
        let mut app = App::new();
        let err = app.get("/files/*/raw", ok()).unwrap_err();
        assert!(err.is_registration());
    }

    #[test]
    fn test_scope_prefix() {
        let mut app = App::new();
        {
            let mut api = app.route("/api/");
            assert_eq!(api.prefix(), "/api");
            api.get("/users/:id", ok()).unwrap();

            let mut v2 = api.route("v2");
            assert_eq!(v2.prefix(), "/api/v2");
            v2.get("/users", ok()).unwrap();
        }

        let m = app.match_route(&Method::GET, "/api/users/42").unwrap();
        assert_eq!(m.params.get("id"), Some("42"));
        assert!(app.match_route(&Method::GET, "/api/v2/users").is_some());
        assert!(app.match_route(&Method::GET, "/users/42").is_none());
    }

    #[test]
    fn test_scope_middleware_is_prefixed() {
        let mut app = App::new();
        app.route("/admin")
            .use_middleware("/*", from_fn("guard", |ctx, next| Box::pin(next.run(ctx))))
            .unwrap();

        assert_eq!(app.middleware().patterns().collect::<Vec<_>>(), ["/admin/*"]);
    }

    #[test]
    fn test_use_middleware_rejects_bad_pattern() {
        let mut app = App::new();
        let err = app
            .use_fn("/:{x", "broken", |ctx, next| Box::pin(next.run(ctx)))
            .unwrap_err();
        assert!(err.is_registration());
        assert!(app.middleware().is_empty());
    }

    #[test]
    fn test_strict_applies_to_routes() {
        let mut app = App::strict(true);
        app.get("/users", ok()).unwrap();

        assert!(app.is_strict());
        assert!(app.match_route(&Method::GET, "/users/").is_none());
    }

    #[test]
    fn test_strict_keeps_registered_trailing_slash() {
        let mut app = App::strict(true);
        app.get("/users/", ok()).unwrap();

        assert!(app.match_route(&Method::GET, "/users/").is_some());
        assert!(app.match_route(&Method::GET, "/users").is_none());
    }

    #[test]
    fn test_lenient_folds_registered_trailing_slash() {
        let mut app = App::new();
        app.get("/users/", ok()).unwrap();

        assert!(!app.is_strict());
        assert!(app.match_route(&Method::GET, "/users").is_some());
        assert!(app.match_route(&Method::GET, "/users/").is_some());
    }

    #[test]
    fn test_with_state() {
        let app = App::new().with_state(42_u32);
        assert_eq!(app.env().get::<u32>(), Some(&42));
    }
}
