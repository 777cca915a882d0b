//! Panic recovery: intercept, classify, redact, report, respond.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use futures_util::FutureExt;
use metrics::counter;
use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;

use crate::channel::registry::{self, Mode};
use crate::format;

/// Classification of a recovered failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanicClass {
    /// The peer closed the connection mid-response. An expected operational
    /// condition, not a bug: no status is written back.
    BrokenPipe,
    /// Anything else. Answered with a bare 500, internals stay internal.
    Generic,
}

impl PanicClass {
    fn label(self) -> &'static str {
        match self {
            PanicClass::BrokenPipe => "broken_pipe",
            PanicClass::Generic => "panic",
        }
    }
}

/// Report attached to the response extensions for a recovered panic, so the
/// enclosing layers (and tests) can observe what happened.
#[derive(Clone, Debug)]
pub struct RecoveredPanic {
    pub class: PanicClass,
    pub message: String,
}

/// Intercept any panic from the rest of the chain.
///
/// The request line and headers are captured up front (body excluded) with
/// the `Authorization` value masked; no credential ever reaches a sink or
/// the notifier. A caught panic is classified, reported on the error
/// channel, forwarded to the notifier, and converted into a response:
/// HTTP 500 with an empty body for a generic panic, or — for a broken
/// pipe — an empty placeholder response with no error status, since the
/// connection is presumed dead.
///
/// Panics are caught exactly once here and never re-propagated; the
/// framework's dispatcher never sees them.
pub async fn panic_recovery(request: Request, next: Next) -> Response {
    let dump = dump_request(&request);
    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => recovered(payload, &dump).await,
    }
}

async fn recovered(payload: Box<dyn Any + Send>, dump: &str) -> Response {
    let message = panic_message(payload.as_ref());
    let class = classify(payload.as_ref(), &message);
    let stack = Backtrace::force_capture().to_string();
    let registry = registry::current();

    let timestamp = format::rfc3339(Utc::now());
    let diagnostic = match class {
        PanicClass::BrokenPipe => format!("{message}\n{}", dump.trim_end()),
        PanicClass::Generic if registry.verbose_recovery() => format!(
            "[Recovery] {timestamp} panic recovered:\n{}\n{message}\n{stack}",
            dump.trim_end(),
        ),
        PanicClass::Generic => {
            format!("[Recovery] {timestamp} panic recovered:\n{message}\n{stack}")
        }
    };

    let line = match registry.mode() {
        Mode::Debug => diagnostic.clone(),
        Mode::Production => format::escape_multiline(&diagnostic),
    };
    crate::err!("{line}");

    counter!("logware_panics_recovered_total", "class" => class.label()).increment(1);

    // The notifier is attempted for every recovered panic, broken pipe
    // included. Its own failures are logged and swallowed downstream.
    // Bind the future in its own statement so the `format_args!` temporary
    // is dropped before the await, keeping this future `Send`.
    let delivery = crate::notify::notify(format_args!("{diagnostic}"));
    delivery.await;

    let report = RecoveredPanic { class, message };
    match class {
        PanicClass::BrokenPipe => {
            let mut response = Response::new(Body::empty());
            response.extensions_mut().insert(report);
            response
        }
        PanicClass::Generic => {
            let mut response = Response::new(Body::empty());
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response.extensions_mut().insert(report);
            response
        }
    }
}

/// Extract a printable message from a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(error) = payload.downcast_ref::<std::io::Error>() {
        error.to_string()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// A failure is a broken pipe when the payload is an I/O error of the
/// matching kind, or when its message names the OS-level condition.
fn classify(payload: &(dyn Any + Send), message: &str) -> PanicClass {
    if let Some(error) = payload.downcast_ref::<std::io::Error>() {
        if matches!(
            error.kind(),
            std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::ConnectionReset
        ) {
            return PanicClass::BrokenPipe;
        }
    }
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("broken pipe") || lowered.contains("connection reset by peer") {
        PanicClass::BrokenPipe
    } else {
        PanicClass::Generic
    }
}

/// Render the request line and headers, body excluded. The `Authorization`
/// value is replaced with a mask.
fn dump_request(request: &Request) -> String {
    let mut dump = format!(
        "{} {} {:?}\n",
        request.method(),
        request.uri(),
        request.version(),
    );
    for (name, value) in request.headers() {
        if name == header::AUTHORIZATION {
            dump.push_str("Authorization: *\n");
            continue;
        }
        dump.push_str(&canonical_name(name.as_str()));
        dump.push_str(": ");
        dump.push_str(&String::from_utf8_lossy(value.as_bytes()));
        dump.push('\n');
    }
    dump
}

/// Canonical MIME casing for a lowercase header name
/// (`content-type` → `Content-Type`).
fn canonical_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
