//! Severity channels and the process-wide sink registry.
//!
//! # Data Flow
//! ```text
//! set_mode(mode) / config::apply
//!     → Registry::for_mode (all five bindings rebuilt)
//!     → one atomic swap of Arc<Registry>
//!     → every subsequent emission reads the new bindings
//!
//! emit::info / warn / err / trace / request_line
//!     → registry snapshot (Arc clone, no lock)
//!     → sink.write_record (locks the target stream for one record)
//! ```
//!
//! # Design Decisions
//! - A registry is immutable once installed; reconfiguration builds a full
//!   replacement, so no reader ever observes a half-updated channel set
//! - Sink targets are injectable so tests can capture emitted bytes
//! - Per-record target locking keeps concurrent records from interleaving

pub mod registry;
pub mod sink;

pub use registry::{
    active_mode, install, set_mode, set_verbose_recovery, Mode, ParseModeError, Registry,
};
pub use sink::{SharedBuf, Sink, SinkTarget};
