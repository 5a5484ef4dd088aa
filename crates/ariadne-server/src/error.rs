//! Server error types.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors raised while starting or running the HTTP server.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The configured bind address could not be parsed.
    #[error("invalid address '{addr}': {reason}")]
    InvalidAddress {
        /// The address as configured.
        addr: String,
        /// Parser message.
        reason: String,
    },

    /// Binding the listener failed.
    #[error("failed to bind to {addr}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ServerError::InvalidAddress {
            addr: "nowhere".to_string(),
            reason: "invalid socket address syntax".to_string(),
        };
        assert!(err.to_string().contains("nowhere"));

        let err = ServerError::Io(std::io::Error::other("connection reset"));
        assert!(err.to_string().contains("connection reset"));
    }
}
