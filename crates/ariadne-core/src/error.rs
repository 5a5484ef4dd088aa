//! Error types for Ariadne.
//!
//! [`Error`] is the failure type that flows through the middleware chain.
//! Every variant is an unhandled failure from the client's point of view:
//! the dispatcher logs it and answers with the fixed internal-error
//! response. A missing route is not an error and never appears here.

use std::any::Any;

use ariadne_router::RouteError;
use http::StatusCode;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Standard error type for Ariadne.
///
/// # Example
///
/// ```
/// use ariadne_core::Error;
///
/// fn load(id: &str) -> Result<String, Error> {
///     if id.is_empty() {
///         return Err(Error::internal("empty id"));
///     }
///     Ok(id.to_string())
/// }
///
/// assert!(load("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A route or middleware pattern was rejected at registration time.
    #[error("Invalid route pattern {pattern:?}: {source}")]
    Registration {
        /// The pattern as supplied by the caller.
        pattern: String,
        /// What was wrong with it.
        #[source]
        source: RouteError,
    },

    /// A handler produced a value that is not a valid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Human-readable error message.
        message: String,
    },

    /// Internal failure raised by a handler or middleware.
    #[error("Internal error: {message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (not exposed to clients).
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A handler or middleware panicked.
    #[error("Panicked: {message}")]
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },
}

impl Error {
    /// Creates a registration error for `pattern`.
    #[must_use]
    pub fn registration(pattern: impl Into<String>, source: RouteError) -> Self {
        Self::Registration {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a handler contract violation.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Creates an error from a caught panic payload.
    #[must_use]
    pub fn panicked(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Panicked { message }
    }

    /// Returns true for errors raised while registering routes.
    #[must_use]
    pub const fn is_registration(&self) -> bool {
        matches!(self, Self::Registration { .. })
    }

    /// Returns the HTTP status code for this error.
    ///
    /// Every failure that reaches the dispatch boundary is answered with
    /// `500 Internal Server Error`.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<http::Error> for Error {
    fn from(err: http::Error) -> Self {
        Self::invalid_response(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_response(format!("failed to serialize body: {err}"))
    }
}
