//! Axum middleware pair: request access logging and panic recovery.
//!
//! Ordering matters: the request logger must wrap the recovery layer so
//! latency and final status are recorded even when a panic was converted
//! into an error response. With `Router::layer`, later layers are
//! outermost:
//!
//! ```text
//! Router::new()
//!     .route(...)
//!     .layer(middleware::from_fn(panic_recovery))   // inner
//!     .layer(middleware::from_fn(request_logger))   // outer
//! ```

pub mod recovery;
pub mod request_logger;

pub use recovery::{panic_recovery, PanicClass, RecoveredPanic};
pub use request_logger::request_logger;
