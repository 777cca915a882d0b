//! The emission API: one function and one macro per severity channel.
//!
//! Each function renders for the mode in effect at call time and writes the
//! record to the channel's sink. Nothing is returned: sink write failures
//! are swallowed by the sink layer.

use chrono::Utc;
use std::backtrace::Backtrace;
use std::fmt;
use std::time::Duration;

use crate::channel::registry::{self, Mode, Registry};
use crate::channel::sink::Sink;
use crate::format;

fn message(level: &'static str, pick: fn(&Registry) -> &Sink, args: fmt::Arguments<'_>) {
    let registry = registry::current();
    let sink = pick(&registry);
    match registry.mode() {
        Mode::Debug => sink.write_record(&format::plain(args)),
        Mode::Production => sink.write_record(&format::json_line(
            level,
            &format::rfc3339(Utc::now()),
            &args.to_string(),
        )),
    }
}

/// Log on the info channel. Prefer the [`info!`](crate::info) macro.
pub fn info(args: fmt::Arguments<'_>) {
    message("info", |r| &r.info, args);
}

/// Log on the warning channel. Prefer the [`warn!`](crate::warn) macro.
pub fn warn(args: fmt::Arguments<'_>) {
    message("warn", |r| &r.warn, args);
}

/// Log on the error channel. Prefer the [`err!`](crate::err) macro.
pub fn err(args: fmt::Arguments<'_>) {
    message("error", |r| &r.err, args);
}

/// Log on the trace channel, capturing the call stack at invocation time.
///
/// Debug mode appends the raw multi-line stack after the message line.
/// Production mode embeds the stack as a `stacktrace` JSON field with
/// newlines and tabs rewritten so the record stays single-line.
pub fn trace(args: fmt::Arguments<'_>) {
    let registry = registry::current();
    let stack = Backtrace::force_capture().to_string();
    match registry.mode() {
        Mode::Debug => {
            let mut body = format::plain(args);
            body.push_str(&stack);
            if !body.ends_with('\n') {
                body.push('\n');
            }
            registry.trace.write_record(&body);
        }
        Mode::Production => registry.trace.write_record(&format::json_trace_line(
            &format::rfc3339(Utc::now()),
            &args.to_string(),
            &format::escape_multiline(&stack),
        )),
    }
}

/// Emit the one access-log line for a completed request/response cycle.
pub(crate) fn request_line(status: u16, latency: Duration, ip: &str, method: &str, path: &str) {
    let registry = registry::current();
    let ts = chrono::Local::now()
        .format("%Y/%m/%d - %H:%M:%S")
        .to_string();
    let line = match registry.mode() {
        Mode::Debug => format::request_debug(&ts, status, latency, ip, method, path),
        Mode::Production => format::request_json(&ts, status, latency, ip, method, path),
    };
    registry.request.write_record(&line);
}

/// Log a formatted message on the info channel.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => { $crate::emit::info(::core::format_args!($($arg)*)) };
}

/// Log a formatted message on the warning channel.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => { $crate::emit::warn(::core::format_args!($($arg)*)) };
}

/// Log a formatted message on the error channel.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => { $crate::emit::err(::core::format_args!($($arg)*)) };
}

/// Log a formatted message on the trace channel with a captured call stack.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => { $crate::emit::trace(::core::format_args!($($arg)*)) };
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex, MutexGuard};

    use crate::channel::registry::{self, test_support, Mode, Registry};
    use crate::channel::sink::{SharedBuf, SinkTarget};

    struct Capture {
        out: SharedBuf,
        errout: SharedBuf,
        _guard: MutexGuard<'static, ()>,
    }

    impl Capture {
        fn undecorated(mode: Mode) -> Self {
            let guard = test_support::REGISTRY_LOCK
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let out: SharedBuf = Arc::new(Mutex::new(Vec::new()));
            let errout: SharedBuf = Arc::new(Mutex::new(Vec::new()));
            registry::install(Registry::undecorated(
                mode,
                SinkTarget::Shared(out.clone()),
                SinkTarget::Shared(errout.clone()),
            ));
            Self {
                out,
                errout,
                _guard: guard,
            }
        }

        fn decorated(mode: Mode) -> Self {
            let guard = test_support::REGISTRY_LOCK
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            let out: SharedBuf = Arc::new(Mutex::new(Vec::new()));
            let errout: SharedBuf = Arc::new(Mutex::new(Vec::new()));
            registry::install(Registry::for_mode_with(
                mode,
                SinkTarget::Shared(out.clone()),
                SinkTarget::Shared(errout.clone()),
            ));
            Self {
                out,
                errout,
                _guard: guard,
            }
        }

        fn out(&self) -> String {
            String::from_utf8(self.out.lock().unwrap().clone()).unwrap()
        }

        fn errout(&self) -> String {
            String::from_utf8(self.errout.lock().unwrap().clone()).unwrap()
        }
    }

    impl Drop for Capture {
        fn drop(&mut self) {
            registry::set_mode(Mode::Debug);
        }
    }

    #[test]
    fn debug_info_is_bracketed() {
        let capture = Capture::undecorated(Mode::Debug);
        crate::info!("ping {}", 1);
        assert_eq!(capture.out(), "[ping 1]\n");
    }

    #[test]
    fn debug_info_with_default_prefix() {
        let capture = Capture::decorated(Mode::Debug);
        crate::info!("hello");
        let line = capture.out();
        assert!(line.starts_with("INFO: "));
        assert!(line.ends_with("[hello]\n"));
    }

    #[test]
    fn production_info_round_trips_as_json() {
        let capture = Capture::decorated(Mode::Production);
        crate::info!("hello {}", 7);
        let line = capture.out();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["date", "loglevel", "message"]);
        assert_eq!(value["loglevel"], "info");
        assert_eq!(value["message"], "hello 7");
    }

    #[test]
    fn warn_and_err_use_their_channels_and_levels() {
        let capture = Capture::decorated(Mode::Production);
        crate::warn!("watch out");
        crate::err!("gone wrong");
        let out: serde_json::Value = serde_json::from_str(&capture.out()).unwrap();
        let errout: serde_json::Value = serde_json::from_str(&capture.errout()).unwrap();
        assert_eq!(out["loglevel"], "warn");
        assert_eq!(errout["loglevel"], "error");
    }

    #[test]
    fn mode_switch_applies_to_next_emission() {
        let capture = Capture::undecorated(Mode::Debug);
        crate::info!("first");
        registry::install(Registry::undecorated(
            Mode::Production,
            SinkTarget::Shared(capture.out.clone()),
            SinkTarget::Shared(capture.errout.clone()),
        ));
        crate::info!("second");
        let out = capture.out();
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap(), "[first]");
        let second: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
        assert_eq!(second["message"], "second");
    }

    #[test]
    fn repeated_emissions_are_identical() {
        let capture = Capture::undecorated(Mode::Debug);
        crate::info!("same");
        crate::info!("same");
        assert_eq!(capture.out(), "[same]\n[same]\n");
    }

    #[test]
    fn debug_trace_appends_raw_stack() {
        let capture = Capture::undecorated(Mode::Debug);
        crate::trace!("checkpoint");
        let out = capture.errout();
        assert!(out.starts_with("[checkpoint]\n"));
        assert!(out.len() > "[checkpoint]\n".len());
    }

    #[test]
    fn production_trace_is_single_line_with_stack_field() {
        let capture = Capture::undecorated(Mode::Production);
        crate::trace!("checkpoint");
        let out = capture.errout();
        assert_eq!(out.lines().count(), 1);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["date", "loglevel", "message", "stacktrace"]);
        assert!(!value["stacktrace"].as_str().unwrap().is_empty());
    }
}
