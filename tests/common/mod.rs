//! Shared utilities for the integration tests.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::State;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use tokio::net::TcpListener;

use logware::channel::{self, Registry, SharedBuf, SinkTarget};
use logware::Mode;

/// The channel registry and notifier are process-wide; tests that touch
/// them must run one at a time.
static REGISTRY_LOCK: Mutex<()> = Mutex::new(());

pub fn lock() -> MutexGuard<'static, ()> {
    REGISTRY_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Redirect all five channels into shared buffers: `(out, errout)`.
pub fn capture_channels(mode: Mode) -> (SharedBuf, SharedBuf) {
    let out: SharedBuf = Arc::new(Mutex::new(Vec::new()));
    let errout: SharedBuf = Arc::new(Mutex::new(Vec::new()));
    channel::install(Registry::for_mode_with(
        mode,
        SinkTarget::Shared(out.clone()),
        SinkTarget::Shared(errout.clone()),
    ));
    (out, errout)
}

pub fn drain(buf: &SharedBuf) -> String {
    String::from_utf8_lossy(&buf.lock().unwrap()).to_string()
}

async fn ping() -> &'static str {
    "pong"
}

async fn boom() -> &'static str {
    panic!("boom");
}

async fn reset() -> &'static str {
    std::panic::panic_any(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "write tcp 127.0.0.1:80: broken pipe",
    ));
}

/// The demo app used by the middleware tests: the recovery layer sits
/// inside the request logger.
pub fn test_app() -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/boom", get(boom))
        .route("/reset", get(reset))
        .layer(middleware::from_fn(logware::panic_recovery))
        .layer(middleware::from_fn(logware::request_logger))
}

/// Serve an app on an ephemeral port, with peer addresses recorded.
pub async fn serve_app(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    addr
}

type SentMessages = Arc<Mutex<Vec<String>>>;

async fn record_message(
    State(sent): State<SentMessages>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    if let Some(text) = body.get("text").and_then(|t| t.as_str()) {
        sent.lock().unwrap().push(text.to_string());
    }
    Json(serde_json::json!({ "ok": true }))
}

/// Minimal stand-in for the bot API: records the `text` of every message it
/// is sent and answers ok.
pub async fn start_mock_bot() -> (SocketAddr, SentMessages) {
    let sent: SentMessages = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/{*path}", post(record_message))
        .with_state(sent.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, sent)
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
