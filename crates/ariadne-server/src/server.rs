//! HTTP/1.1 bootstrap.
//!
//! Nothing listens until [`serve`] is called with a finished [`App`]:
//!
//! - bind a Tokio `TcpListener` on the configured address
//! - serve each connection with hyper, collecting the body before dispatch
//! - on shutdown, stop accepting and give open connections the configured
//!   timeout to finish
//!
//! # Example
//!
//! ```rust,ignore
//! use ariadne_server::{serve, App, ServerConfig, ShutdownSignal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new();
//!     let config = ServerConfig::builder().http_addr("0.0.0.0:8080").build();
//!
//!     serve(app, &config, ShutdownSignal::with_os_signals()).await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use ariadne_core::{responses, Response};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use crate::app::App;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Binds the configured address and serves `app` until `shutdown` fires.
///
/// # Errors
///
/// Returns `ServerError` if the address is invalid or cannot be bound.
pub async fn serve(app: App, config: &ServerConfig, shutdown: ShutdownSignal) -> Result<(), ServerError> {
    let addr = config.socket_addr().map_err(|e| ServerError::InvalidAddress {
        addr: config.http_addr().to_string(),
        reason: e.to_string(),
    })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    serve_listener(app, listener, config, shutdown).await
}

/// Serves `app` on an already bound listener until `shutdown` fires.
///
/// Only the shutdown timeout is read from `config`.
///
/// # Errors
///
/// Returns `ServerError::Io` if the listener's address cannot be read.
pub async fn serve_listener(
    app: App,
    listener: TcpListener,
    config: &ServerConfig,
    shutdown: ShutdownSignal,
) -> Result<(), ServerError> {
    let local_addr = listener.local_addr()?;
    tracing::info!(
        addr = %local_addr,
        routes = app.routes().len(),
        middleware = app.middleware().len(),
        "server listening"
    );

    let app = Arc::new(app);
    let tracker = ConnectionTracker::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, remote_addr)) => {
                    let app = Arc::clone(&app);
                    let token = tracker.acquire();
                    let shutdown = shutdown.clone();

                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(app, stream, remote_addr, shutdown).await {
                            tracing::debug!(remote_addr = %remote_addr, error = %e, "connection error");
                        }
                        drop(token);
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to accept connection");
                }
            },
            () = shutdown.recv() => {
                tracing::info!("shutdown signal received, no longer accepting connections");
                break;
            }
        }
    }

    let timeout = config.shutdown_timeout();
    tracing::info!(
        active = tracker.active_connections(),
        timeout_ms = timeout.as_millis() as u64,
        "waiting for connections to close"
    );

    tokio::select! {
        () = tracker.wait_for_drain() => tracing::info!("all connections closed"),
        () = tokio::time::sleep(timeout) => tracing::warn!(
            active = tracker.active_connections(),
            "shutdown timeout reached with connections still open"
        ),
    }

    tracing::info!("server stopped");
    Ok(())
}

async fn serve_connection(
    app: Arc<App>,
    stream: TcpStream,
    remote_addr: SocketAddr,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |request: http::Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { Ok::<_, Infallible>(handle(&app, request).await) }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            // Finish the in-flight exchange, then close.
            conn.as_mut().graceful_shutdown();
            tracing::debug!(remote_addr = %remote_addr, "closing connection for shutdown");
            conn.await
        }
    }
}

async fn handle(app: &App, request: http::Request<Incoming>) -> Response {
    let (parts, body) = request.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read request body");
            return responses::internal_error();
        }
    };

    app.dispatch(http::Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_serve_invalid_address() {
        let config = ServerConfig::builder().http_addr("not-an-address").build();

        let result = serve(App::new(), &config, ShutdownSignal::new()).await;
        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:0")
            .shutdown_timeout(Duration::from_millis(100))
            .build();

        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            serve(App::new(), &config, shutdown),
        )
        .await;

        assert!(matches!(result, Ok(Ok(()))));
    }
}
