//! The process-wide channel registry and mode switch.

use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::channel::sink::{Sink, SinkTarget};

/// Global formatting strategy selector: human-readable debug output or
/// single-line JSON for production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Debug,
    Production,
}

/// An unrecognized mode string.
///
/// This is a fatal configuration error: callers are expected to abort
/// startup rather than continue with undefined logging behavior.
#[derive(Debug, Error)]
#[error("unrecognized logging mode `{0}`; expected `debug` or `production`")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Mode::Debug),
            "production" => Ok(Mode::Production),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// One consistent set of channel bindings.
///
/// A registry is immutable once installed; every reconfiguration builds a
/// complete replacement and swaps it in, so readers never observe a mix of
/// old and new channel bindings.
#[derive(Clone, Debug)]
pub struct Registry {
    mode: Mode,
    verbose_recovery: bool,
    pub(crate) info: Sink,
    pub(crate) request: Sink,
    pub(crate) warn: Sink,
    pub(crate) err: Sink,
    pub(crate) trace: Sink,
}

impl Registry {
    /// Standard bindings for a mode: info, warn and request go to stdout,
    /// err and trace to stderr.
    pub fn for_mode(mode: Mode) -> Self {
        Self::for_mode_with(mode, SinkTarget::Stdout, SinkTarget::Stderr)
    }

    /// Same channel layout with custom targets: `out` receives info, warn
    /// and request; `errout` receives err and trace. Used by tests and
    /// embedders that capture log output.
    pub fn for_mode_with(mode: Mode, out: SinkTarget, errout: SinkTarget) -> Self {
        match mode {
            Mode::Debug => Self {
                mode,
                verbose_recovery: true,
                info: Sink::new(out.clone(), "INFO: ", true),
                request: Sink::new(out.clone(), "REQUEST: ", false),
                warn: Sink::new(out, "WARN: ", true),
                err: Sink::new(errout.clone(), "ERROR: ", true),
                trace: Sink::new(errout, "TRACE: ", true),
            },
            // The level lives inside the JSON payload, so production sinks
            // carry no prefix and no line header.
            Mode::Production => Self {
                mode,
                verbose_recovery: false,
                info: Sink::new(out.clone(), "", false),
                request: Sink::new(out.clone(), "", false),
                warn: Sink::new(out, "", false),
                err: Sink::new(errout.clone(), "", false),
                trace: Sink::new(errout, "", false),
            },
        }
    }

    /// Channel layout with no prefixes and no line headers, for byte-exact
    /// assertions on rendered records.
    #[cfg(test)]
    pub(crate) fn undecorated(mode: Mode, out: SinkTarget, errout: SinkTarget) -> Self {
        Self {
            mode,
            verbose_recovery: mode == Mode::Debug,
            info: Sink::new(out.clone(), "", false),
            request: Sink::new(out.clone(), "", false),
            warn: Sink::new(out, "", false),
            err: Sink::new(errout.clone(), "", false),
            trace: Sink::new(errout, "", false),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether recovery diagnostics include the redacted request dump.
    pub fn verbose_recovery(&self) -> bool {
        self.verbose_recovery
    }
}

static ACTIVE: Lazy<ArcSwap<Registry>> =
    Lazy::new(|| ArcSwap::from_pointee(Registry::for_mode(Mode::Debug)));

/// Snapshot of the active registry. Cheap: an `Arc` clone, no lock.
pub(crate) fn current() -> Arc<Registry> {
    ACTIVE.load_full()
}

/// Reconfigure all five channels for `mode` in one atomic swap.
///
/// Legal at any point in the process lifetime; the very next emission on any
/// channel uses the new bindings. The default, if never called, is
/// [`Mode::Debug`].
pub fn set_mode(mode: Mode) {
    install(Registry::for_mode(mode));
}

/// Install a fully-built registry, replacing the active one wholesale.
/// For tests and embedders that redirect sink targets.
pub fn install(registry: Registry) {
    ACTIVE.store(Arc::new(registry));
}

/// Mode currently in effect.
pub fn active_mode() -> Mode {
    ACTIVE.load().mode
}

/// Override whether recovery diagnostics carry the redacted request dump.
/// The mode default is on for debug, off for production.
pub fn set_verbose_recovery(verbose: bool) {
    let mut next = (**ACTIVE.load()).clone();
    next.verbose_recovery = verbose;
    ACTIVE.store(Arc::new(next));
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_known_values() {
        assert_eq!("debug".parse::<Mode>().unwrap(), Mode::Debug);
        assert_eq!(" Production ".parse::<Mode>().unwrap(), Mode::Production);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "verbose".parse::<Mode>().unwrap_err();
        assert!(err.to_string().contains("verbose"));
    }

    #[test]
    fn mode_defaults_to_debug() {
        assert_eq!(Mode::default(), Mode::Debug);
    }

    #[test]
    fn registry_swap_is_whole() {
        let _guard = test_support::REGISTRY_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        set_mode(Mode::Production);
        let snapshot = current();
        assert_eq!(snapshot.mode(), Mode::Production);
        assert!(!snapshot.verbose_recovery());

        set_mode(Mode::Debug);
        assert_eq!(active_mode(), Mode::Debug);
        // The earlier snapshot is unaffected by the swap.
        assert_eq!(snapshot.mode(), Mode::Production);
    }

    #[test]
    fn verbose_override_keeps_mode() {
        let _guard = test_support::REGISTRY_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        set_mode(Mode::Production);
        set_verbose_recovery(true);
        let snapshot = current();
        assert_eq!(snapshot.mode(), Mode::Production);
        assert!(snapshot.verbose_recovery());

        set_mode(Mode::Debug);
    }
}
