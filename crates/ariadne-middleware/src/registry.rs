//! Path-scoped middleware registrations.
//!
//! Each registration gets its own single-route index keyed under
//! [`MethodKey::Any`], so whether a middleware applies depends on the
//! request path alone. Entries are matched independently of each other
//! and of the route lookup; a middleware still runs when no route exists
//! for the path.

use ariadne_router::{MethodKey, RouteError, Router};

use crate::compose::BoxedMiddleware;

/// One `use(pattern, middleware)` registration.
#[derive(Clone)]
struct Entry {
    pattern: String,
    index: Router<BoxedMiddleware>,
}

/// Ordered collection of path-scoped middleware.
///
/// A pattern covers exactly the paths it matches as a route would; use a
/// trailing `/*` to cover a whole subtree (`/api/*` covers `/api` and
/// everything below it).
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ariadne_middleware::{from_fn, MiddlewareRegistry};
///
/// let mut registry = MiddlewareRegistry::new();
/// registry
///     .add("/api/*", Arc::new(from_fn("auth", |ctx, next| Box::pin(next.run(ctx)))))
///     .unwrap();
///
/// assert_eq!(registry.matching("/api/users").len(), 1);
/// assert!(registry.matching("/health").is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MiddlewareRegistry {
    entries: Vec<Entry>,
    strict: bool,
}

impl MiddlewareRegistry {
    /// Creates an empty, non-strict registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry whose patterns treat a trailing `/` as
    /// significant when `strict` is true.
    #[must_use]
    pub fn strict(strict: bool) -> Self {
        Self {
            entries: Vec::new(),
            strict,
        }
    }

    /// Registers `middleware` for every path matching `pattern`.
    pub fn add(&mut self, pattern: &str, middleware: BoxedMiddleware) -> Result<(), RouteError> {
        let mut index = Router::strict(self.strict);
        index.insert(MethodKey::Any, pattern, middleware)?;
        self.entries.push(Entry {
            pattern: pattern.to_string(),
            index,
        });
        Ok(())
    }

    /// Returns every middleware whose pattern matches `path`, in
    /// registration order.
    #[must_use]
    pub fn matching(&self, path: &str) -> Vec<BoxedMiddleware> {
        self.entries
            .iter()
            .filter_map(|entry| entry.index.match_any(path))
            .map(|m| m.handler().clone())
            .collect()
    }

    /// Returns the registered patterns, in registration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.pattern.as_str())
    }

    /// Returns the number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareRegistry")
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .field("strict", &self.strict)
            .finish()
    }
}
