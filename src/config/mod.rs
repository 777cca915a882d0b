//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogwareConfig (validated, immutable)
//!     → apply(): atomic mode swap + notifier reconfiguration
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates (a bad file keeps the current config)
//!     → apply() re-installs the channel registry and notifier
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a full reload
//! - All fields have defaults so a minimal config is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{LoggingConfig, LogwareConfig, NotifierConfig};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;

/// Install a validated configuration process-wide: one atomic channel
/// registry swap plus notifier reconfiguration. Safe to call again on
/// reload; the next emission on any channel uses the new bindings.
pub fn apply(config: &LogwareConfig) {
    crate::channel::set_mode(config.logging.mode);
    if let Some(verbose) = config.logging.verbose_recovery {
        crate::channel::set_verbose_recovery(verbose);
    }
    crate::notify::configure(&config.notifier);
}
