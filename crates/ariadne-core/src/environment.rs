//! Application state shared by every dispatch.
//!
//! The [`Environment`] is assembled once while the application is being
//! configured and is read-only afterwards. Values are keyed by their type.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A type-keyed map of shared application state.
///
/// # Example
///
/// ```rust
/// use ariadne_core::Environment;
///
/// struct Database {
///     url: String,
/// }
///
/// let mut env = Environment::new();
/// env.insert(Database { url: "postgres://localhost".to_string() });
///
/// let db = env.get::<Database>().unwrap();
/// assert_eq!(db.url, "postgres://localhost");
/// ```
#[derive(Default, Clone)]
pub struct Environment {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Environment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Stores `value`, replacing any earlier value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) {
        self.values.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Returns the value of type `T`, if one was stored.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns a shared handle to the value of type `T`.
    #[must_use]
    pub fn get_arc<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| Arc::clone(v).downcast::<T>().ok())
    }

    /// Checks if a value of type `T` is stored.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("value_count", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Config {
        name: &'static str,
    }

    #[test]
    fn test_environment_new() {
        let env = Environment::new();
        assert!(env.is_empty());
        assert_eq!(env.len(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut env = Environment::new();
        env.insert(Config { name: "orders" });

        assert!(env.contains::<Config>());
        assert_eq!(env.get::<Config>(), Some(&Config { name: "orders" }));
        assert_eq!(env.get_arc::<Config>().unwrap().name, "orders");
    }

    #[test]
    fn test_missing_type() {
        let env = Environment::new();
        assert!(env.get::<Config>().is_none());
        assert!(!env.contains::<Config>());
    }

    #[test]
    fn test_insert_replaces_same_type() {
        let mut env = Environment::new();
        env.insert(1_u32);
        env.insert(2_u32);
        assert_eq!(env.len(), 1);
        assert_eq!(env.get::<u32>(), Some(&2));
    }
}
