//! High-level router API.
//!
//! This module provides the main [`Router`] struct which is the primary
//! interface for registering and matching routes.

use http::Method;

use crate::error::RouteError;
use crate::method::MethodKey;
use crate::node::Node;
use crate::params::Params;
use crate::pattern::{parse, split};
use crate::RouteMatch;

/// A segment trie mapping `(method, path)` to registered handlers.
///
/// The router is generic over the handler type `H`, so the same index
/// serves request handlers and path-scoped middleware alike.
///
/// # Example
///
/// ```rust
/// use ariadne_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.add("get", "/users", "listUsers").unwrap();
/// router.add("get", "/users/:id", "getUser").unwrap();
///
/// let m = router.match_route(&Method::GET, "/users/123").unwrap();
/// assert_eq!(*m.handler(), "getUser");
/// assert_eq!(m.params.get("id"), Some("123"));
/// ```
///
/// # Route Priority
///
/// When multiple routes could match, each segment is tried as:
///
/// 1. **Literal segments** (e.g., `/users/me`)
/// 2. **Constrained parameters** (e.g., `/users/:id{\d+}`), first registered first
/// 3. **Unconstrained parameters** (e.g., `/users/:id`)
/// 4. **Wildcard** (e.g., `/files/*`)
///
/// A branch that fails deeper in the path is abandoned and the next
/// candidate is tried, so `/users/me` beats `/users/:id` regardless of
/// registration order, yet `/users/me/posts` still reaches
/// `/users/:id/posts` when only `/users/me/settings` exists.
#[derive(Debug, Clone)]
pub struct Router<H> {
    root: Node<H>,
    strict: bool,
    route_count: usize,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    /// Creates a new empty, non-strict router.
    #[must_use]
    pub fn new() -> Self {
        Self::strict(false)
    }

    /// Creates a new empty router in which a trailing `/` is significant
    /// when `strict` is true.
    ///
    /// Patterns are normalized as they are inserted, so strictness is fixed
    /// for the router's lifetime.
    #[must_use]
    pub fn strict(strict: bool) -> Self {
        Self {
            root: Node::new(),
            strict,
            route_count: 0,
        }
    }

    /// Returns true if trailing separators are significant.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Registers `handler` under a method token and a path pattern.
    ///
    /// The method token is case-insensitive; `"ALL"` registers the handler
    /// for every method.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ariadne_router::Router;
    ///
    /// let mut router = Router::new();
    /// router.add("post", "/users", "createUser").unwrap();
    /// assert!(router.add("get", "/files/*/raw", "bad").is_err());
    /// ```
    pub fn add(&mut self, method: &str, pattern: &str, handler: H) -> Result<(), RouteError> {
        let key = MethodKey::parse(method)?;
        self.insert(key, pattern, handler)
    }

    /// Registers several handlers under one method and pattern, in order.
    pub fn add_all<I>(&mut self, method: &str, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = H>,
    {
        let key = MethodKey::parse(method)?;
        let segments = parse(self.normalize(pattern))?;

        let mut added = 0;
        for handler in handlers {
            self.root.insert(&segments, key.clone(), handler);
            added += 1;
        }
        if added == 0 {
            return Err(RouteError::MissingHandler {
                pattern: pattern.to_string(),
            });
        }
        self.route_count += 1;
        Ok(())
    }

    /// Registers `handler` under an already parsed method key.
    pub fn insert(&mut self, method: MethodKey, pattern: &str, handler: H) -> Result<(), RouteError> {
        let segments = parse(self.normalize(pattern))?;
        self.root.insert(&segments, method, handler);
        self.route_count += 1;
        Ok(())
    }

    /// Matches a request method and path.
    ///
    /// Returns `None` when no route serves the pair; a node registered
    /// under `ALL` serves every method.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, H>> {
        self.match_key(&MethodKey::from(method), path)
    }

    /// Matches a path against handlers registered under `method`.
    #[must_use]
    pub fn match_key(&self, method: &MethodKey, path: &str) -> Option<RouteMatch<'_, H>> {
        let segments = split(self.normalize(path));
        let mut params = Params::new();
        let handlers = self.root.find(&segments, method, &mut params)?;
        RouteMatch::new(handlers, params)
    }

    /// Matches a path against handlers registered under `ALL` only.
    ///
    /// This is the method-independent lookup used for path-scoped
    /// middleware.
    #[must_use]
    pub fn match_any(&self, path: &str) -> Option<RouteMatch<'_, H>> {
        self.match_key(&MethodKey::Any, path)
    }

    /// Applies the router's trailing-slash policy to `path`.
    ///
    /// In non-strict mode a single trailing `/` is removed; the root path
    /// is left as is.
    #[must_use]
    pub fn normalize<'p>(&self, path: &'p str) -> &'p str {
        if self.strict || path.len() <= 1 {
            return path;
        }
        path.strip_suffix('/').unwrap_or(path)
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
