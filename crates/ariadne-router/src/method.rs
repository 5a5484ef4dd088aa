//! HTTP method keys.
//!
//! Handlers are stored per [`MethodKey`]. Besides the concrete HTTP
//! methods there is one pseudo-method, [`MethodKey::Any`], written `ALL`
//! (or `*`) at registration time. Path-scoped middleware is always
//! registered under it so that its scope depends on the path only.

use std::fmt;
use std::str::FromStr;

use http::Method;

use crate::error::RouteError;

/// The key a handler is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MethodKey {
    /// Matches every request method.
    Any,
    /// Matches exactly one request method.
    Exact(Method),
}

impl MethodKey {
    /// Parses a method token case-insensitively.
    ///
    /// `"all"` and `"*"` map to [`MethodKey::Any`]; anything else is
    /// uppercased and parsed as an HTTP method, so extension methods such
    /// as `PURGE` are accepted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ariadne_router::MethodKey;
    /// use http::Method;
    ///
    /// assert_eq!(MethodKey::parse("get").unwrap(), MethodKey::Exact(Method::GET));
    /// assert_eq!(MethodKey::parse("ALL").unwrap(), MethodKey::Any);
    /// ```
    pub fn parse(token: &str) -> Result<Self, RouteError> {
        let upper = token.trim().to_ascii_uppercase();
        if upper == "ALL" || upper == "*" {
            return Ok(Self::Any);
        }
        Method::from_bytes(upper.as_bytes())
            .map(Self::Exact)
            .map_err(|_| RouteError::InvalidMethod(token.to_string()))
    }

    /// Returns true for the any-method key.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<Method> for MethodKey {
    fn from(method: Method) -> Self {
        Self::Exact(method)
    }
}

impl From<&Method> for MethodKey {
    fn from(method: &Method) -> Self {
        Self::Exact(method.clone())
    }
}

impl FromStr for MethodKey {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("ALL"),
            Self::Exact(method) => f.write_str(method.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(MethodKey::parse("get").unwrap(), MethodKey::Exact(Method::GET));
        assert_eq!(MethodKey::parse("Post").unwrap(), MethodKey::Exact(Method::POST));
        assert_eq!(MethodKey::parse("DELETE").unwrap(), MethodKey::Exact(Method::DELETE));
    }

    #[test]
    fn test_parse_any() {
        assert!(MethodKey::parse("all").unwrap().is_any());
        assert!(MethodKey::parse("*").unwrap().is_any());
    }

    #[test]
    fn test_parse_extension_method() {
        let key = MethodKey::parse("purge").unwrap();
        assert_eq!(key.to_string(), "PURGE");
    }

    #[test]
    fn test_parse_invalid() {
        let err = MethodKey::parse("GE T").unwrap_err();
        assert!(matches!(err, RouteError::InvalidMethod(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(MethodKey::Any.to_string(), "ALL");
        assert_eq!(MethodKey::from(Method::PATCH).to_string(), "PATCH");
    }
}
