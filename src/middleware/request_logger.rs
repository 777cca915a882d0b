//! Access logging for one request/response cycle.

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::counter;
use std::net::SocketAddr;
use std::time::Instant;

use crate::emit;

/// Wrap one request/response cycle and emit exactly one request-channel line.
///
/// Records the start instant and the path plus raw query up front, runs the
/// rest of the chain, then logs final status, elapsed latency, client IP and
/// method. Layer this outside [`panic_recovery`](crate::panic_recovery) so
/// recovered panics still produce an access-log line with their final
/// status.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let path = request.uri().path().to_string();
    let raw_query = request.uri().query().map(str::to_owned);
    let method = request.method().to_string();
    let ip = client_ip(&request);

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();
    let path = match raw_query {
        Some(raw) if !raw.is_empty() => format!("{path}?{raw}"),
        _ => path,
    };

    counter!(
        "logware_requests_total",
        "method" => method.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    emit::request_line(status, latency, &ip, &method, &path);

    response
}

/// Best-effort client address: forwarded headers first, then the peer
/// address recorded by the server's connect info.
fn client_ip(request: &Request) -> String {
    for header in ["x-forwarded-for", "x-real-ip"] {
        if let Some(value) = request.headers().get(header).and_then(|v| v.to_str().ok()) {
            if let Some(first) = value.split(',').next() {
                let first = first.trim();
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
