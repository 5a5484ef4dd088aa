//! Serving a real socket.

use std::time::Duration;

use ariadne_core::{handler_fn, Request};
use ariadne_server::{serve_listener, App, ServerConfig, ShutdownSignal};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> anyhow::Result<String> {
    let mut stream = TcpStream::connect(addr).await?;
    stream.write_all(raw.as_bytes()).await?;

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(String::from_utf8(buf)?)
}

#[tokio::test]
async fn serves_requests_until_shutdown() -> anyhow::Result<()> {
    let mut app = App::new();
    app.get(
        "/users/:id",
        handler_fn(|req: Request| async move { format!("user {}", req.param("id").unwrap_or_default()) }),
    )?;
    app.post(
        "/echo",
        handler_fn(|req: Request| async move { req.body().clone() }),
    )?;

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let config = ServerConfig::builder()
        .shutdown_timeout(Duration::from_secs(1))
        .build();
    let shutdown = ShutdownSignal::new();

    let server = tokio::spawn({
        let shutdown = shutdown.clone();
        async move { serve_listener(app, listener, &config, shutdown).await }
    });

    let found = roundtrip(addr, "GET /users/7 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await?;
    assert!(found.starts_with("HTTP/1.1 200 OK"), "{found}");
    assert!(found.ends_with("user 7"), "{found}");

    let echoed = roundtrip(
        addr,
        "POST /echo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
    )
    .await?;
    assert!(echoed.ends_with("hello"), "{echoed}");

    let missing = roundtrip(addr, "GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n").await?;
    assert!(missing.starts_with("HTTP/1.1 404 Not Found"), "{missing}");
    assert!(missing.ends_with("Not Found"), "{missing}");

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), server).await???;
    Ok(())
}
