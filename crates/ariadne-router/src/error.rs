//! Registration-time routing errors.

use thiserror::Error;

/// Errors raised while registering a route pattern.
///
/// Lookups never fail: an unmatched path is reported as `None`, not as
/// an error. Everything here is raised synchronously by `Router::add`
/// and friends, before any request is served.
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    /// The method token is not a valid HTTP method.
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// A parameter segment has no name (e.g. `/users/:`).
    #[error("parameter segment {segment:?} has an empty name")]
    EmptyParamName {
        /// The offending segment.
        segment: String,
    },

    /// A parameter constraint opens a brace without closing it.
    #[error("parameter segment {segment:?} has an unbalanced constraint brace")]
    UnbalancedBrace {
        /// The offending segment.
        segment: String,
    },

    /// A parameter constraint is not a valid regular expression.
    #[error("invalid constraint {constraint:?} on parameter {name:?}: {reason}")]
    InvalidConstraint {
        /// Parameter name.
        name: String,
        /// The constraint source as written.
        constraint: String,
        /// Regex compiler message.
        reason: String,
    },

    /// The wildcard marker appears before the final segment.
    #[error("wildcard must be the last segment in {pattern:?}")]
    WildcardNotLast {
        /// The full pattern.
        pattern: String,
    },

    /// `add_all` was called with an empty handler list.
    #[error("no handler supplied for {pattern:?}")]
    MissingHandler {
        /// The full pattern.
        pattern: String,
    },
}
