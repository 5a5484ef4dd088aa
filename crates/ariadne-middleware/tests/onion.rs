//! Ordering and short-circuit behavior of composed chains.

use std::sync::{Arc, Mutex};

use ariadne_core::{handler_fn, Environment, Error, Request};
use ariadne_middleware::{compose, BoxFuture, BoxedMiddleware, Context, Endpoint, Middleware, Next};
use ariadne_router::Params;
use bytes::Bytes;
use http::StatusCode;

type Log = Arc<Mutex<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
    proceed: bool,
}

impl Recorder {
    fn boxed(name: &'static str, log: &Log) -> BoxedMiddleware {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            proceed: true,
        })
    }

    fn blocking(name: &'static str, log: &Log) -> BoxedMiddleware {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            proceed: false,
        })
    }
}

impl Middleware for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle<'a>(
        &'a self,
        ctx: &'a mut Context,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<(), Error>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(format!("{}-before", self.name));
            if self.proceed {
                next.run(ctx).await?;
            }
            self.log.lock().unwrap().push(format!("{}-after", self.name));
            Ok(())
        })
    }
}

fn terminal(log: &Log) -> BoxedMiddleware {
    let log = Arc::clone(log);
    Arc::new(Endpoint::new(Arc::new(handler_fn(move |_req: Request| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push("terminal".to_string());
            "ok"
        }
    }))))
}

fn failing_terminal() -> BoxedMiddleware {
    Arc::new(Endpoint::new(Arc::new(handler_fn(|_req: Request| async {
        Err::<&'static str, _>(Error::internal("handler failed"))
    }))))
}

fn context() -> Context {
    let raw = http::Request::builder().uri("/").body(Bytes::new()).unwrap();
    Context::new(Request::from_http(raw, Params::new()), Arc::new(Environment::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

#[tokio::test]
async fn terminal_only_runs_exactly_once() {
    let log = Log::default();
    let chain = vec![terminal(&log)];

    let mut ctx = context();
    compose(&chain).run(&mut ctx).await.unwrap();

    assert_eq!(entries(&log), vec!["terminal"]);
    assert_eq!(ctx.response().unwrap().status(), StatusCode::OK);
}

#[tokio::test]
async fn onion_order() {
    let log = Log::default();
    let chain = vec![
        Recorder::boxed("mwA", &log),
        Recorder::boxed("mwB", &log),
        terminal(&log),
    ];

    let mut ctx = context();
    compose(&chain).run(&mut ctx).await.unwrap();

    assert_eq!(
        entries(&log),
        vec!["mwA-before", "mwB-before", "terminal", "mwB-after", "mwA-after"]
    );
}

#[tokio::test]
async fn short_circuit_skips_inner_entries() {
    let log = Log::default();
    let chain = vec![
        Recorder::boxed("outer", &log),
        Recorder::blocking("gate", &log),
        Recorder::boxed("inner", &log),
        terminal(&log),
    ];

    let mut ctx = context();
    compose(&chain).run(&mut ctx).await.unwrap();

    assert_eq!(
        entries(&log),
        vec!["outer-before", "gate-before", "gate-after", "outer-after"]
    );
    assert!(ctx.response().is_none());
}

#[tokio::test]
async fn handler_failure_abandons_after_phases() {
    let log = Log::default();
    let chain = vec![Recorder::boxed("outer", &log), failing_terminal()];

    let mut ctx = context();
    let result = compose(&chain).run(&mut ctx).await;

    assert!(matches!(result, Err(Error::Internal { .. })));
    assert_eq!(entries(&log), vec!["outer-before"]);
}

#[tokio::test]
async fn chains_are_rebuilt_per_dispatch() {
    let log = Log::default();
    let chain = vec![Recorder::boxed("mw", &log), terminal(&log)];

    for _ in 0..2 {
        let mut ctx = context();
        compose(&chain).run(&mut ctx).await.unwrap();
    }

    assert_eq!(
        entries(&log),
        vec![
            "mw-before", "terminal", "mw-after", "mw-before", "terminal", "mw-after"
        ]
    );
}
