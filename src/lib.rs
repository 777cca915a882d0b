//! Structured logging with two output modes, an axum middleware pair, and a
//! best-effort notification side-channel.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                  logware                     │
//!                      │                                              │
//!   info!/warn!/       │  ┌────────┐    ┌────────┐    ┌───────────┐  │
//!   err!/trace! ───────┼─▶│  emit  │───▶│ format │───▶│  channel  │──┼──▶ stdout/stderr
//!                      │  └────────┘    └────────┘    │ registry  │  │
//!                      │                              └───────────┘  │
//!   HTTP request ──────┼─▶ request_logger ─▶ panic_recovery ─▶ ...   │
//!                      │        │                  │                 │
//!                      │        └── access line    └── diagnostic ───┼──▶ notifier (bot API)
//!                      │                                              │
//!                      │  ┌────────────────────────────────────────┐ │
//!                      │  │  config: schema → loader → validation  │ │
//!                      │  │          → apply (atomic mode swap)    │ │
//!                      │  └────────────────────────────────────────┘ │
//!                      └──────────────────────────────────────────────┘
//! ```
//!
//! The five severity channels (info, warn, error, trace, request) are bound
//! to their sinks by a process-wide registry that is swapped wholesale on
//! every mode change, so the very next emission uses the new format.
//!
//! # Quick start
//!
//! ```no_run
//! use axum::{middleware, routing::get, Router};
//! use std::net::SocketAddr;
//!
//! # async fn run() {
//! logware::set_mode(logware::Mode::Production);
//!
//! let app = Router::new()
//!     .route("/ping", get(|| async { "pong" }))
//!     .layer(middleware::from_fn(logware::panic_recovery))
//!     .layer(middleware::from_fn(logware::request_logger));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//! logware::info!("listening on {}", listener.local_addr().unwrap());
//! axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
//!     .await
//!     .unwrap();
//! # }
//! ```
//!
//! # Message hygiene in production mode
//!
//! Production-mode `info!`/`warn!`/`err!` embed the rendered message in the
//! JSON line verbatim. A message containing double quotes or control
//! characters will break the line's JSON well-formedness; callers own
//! message content. Stack traces are the exception: `trace!` and the
//! recovery diagnostics are escaped to stay single-line.

pub mod channel;
pub mod config;
pub mod emit;
mod format;
pub mod middleware;
pub mod notify;

pub use channel::{active_mode, set_mode, Mode, ParseModeError};
pub use config::{load_config, ConfigError, LogwareConfig};
pub use middleware::{panic_recovery, request_logger, PanicClass, RecoveredPanic};
