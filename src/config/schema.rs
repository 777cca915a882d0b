//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files and
//! default to a runnable debug setup, so a minimal (or absent) file is
//! valid.

use serde::{Deserialize, Serialize};

use crate::channel::Mode;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LogwareConfig {
    /// Output mode and recovery diagnostics.
    pub logging: LoggingConfig,

    /// External notification sink.
    pub notifier: NotifierConfig,
}

/// Logging behavior.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output mode: `debug` or `production`. Any other value fails
    /// deserialization; startup must not continue with undefined logging
    /// behavior.
    pub mode: Mode,

    /// Force recovery diagnostics to include (`true`) or omit (`false`) the
    /// redacted request dump, overriding the mode default.
    pub verbose_recovery: Option<bool>,
}

/// Notification side-channel settings. The credential is injected here
/// rather than compiled in.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Enable delivery. Disabled leaves `notify` a local no-op.
    pub enabled: bool,

    /// Bot credential.
    pub bot_token: String,

    /// Destination chat.
    pub chat_id: i64,

    /// Bot API base URL. Overridable for self-hosted gateways and tests.
    pub api_url: String,

    /// Delivery timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bot_token: String::new(),
            chat_id: 0,
            api_url: "https://api.telegram.org".to_string(),
            timeout_secs: 10,
        }
    }
}
