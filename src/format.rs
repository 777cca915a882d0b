//! Pure record rendering for both output modes. No I/O here.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::time::Duration;

/// Debug-mode body: the substituted message in square brackets.
pub(crate) fn plain(args: fmt::Arguments<'_>) -> String {
    format!("[{args}]\n")
}

/// Production-mode JSON body for info/warn/error.
///
/// The message is embedded verbatim; content with double quotes or control
/// characters breaks the line's well-formedness. See the crate docs.
pub(crate) fn json_line(level: &str, date: &str, message: &str) -> String {
    format!("{{\"loglevel\":\"{level}\",\"date\":\"{date}\",\"message\":\"{message}\"}}\n")
}

/// Production-mode JSON body for trace, with the escaped stack appended.
pub(crate) fn json_trace_line(date: &str, message: &str, stack: &str) -> String {
    format!(
        "{{\"loglevel\":\"trace\",\"date\":\"{date}\",\"message\":\"{message}\",\"stacktrace\":\"{stack}\"}}\n"
    )
}

/// Rewrite newlines and tabs to their literal two-character escape sequences
/// so a multi-line capture fits a single-line JSON field.
pub(crate) fn escape_multiline(s: &str) -> String {
    s.replace('\n', "\\n").replace('\t', "\\t")
}

/// RFC 3339 timestamp, second precision, UTC.
pub(crate) fn rfc3339(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Debug-mode access log line with fixed-width columns:
/// `<ts> | <status:3> | <latency:13> | <ip:15> |<method:-7> <path>`.
pub(crate) fn request_debug(
    ts: &str,
    status: u16,
    latency: Duration,
    ip: &str,
    method: &str,
    path: &str,
) -> String {
    format!(
        "{ts} | {status:3} | {lat:>13} | {ip:>15} |{method:<7} {path}\n",
        lat = format!("{latency:?}"),
    )
}

/// Production-mode access log line.
pub(crate) fn request_json(
    date: &str,
    status: u16,
    latency: Duration,
    ip: &str,
    method: &str,
    path: &str,
) -> String {
    format!(
        "{{\"logLevel\":\"request\",\"date\": \"{date}\",\"statusCode\":\"{status}\",\"latency\":\"{latency:?}\",\"ip\":\"{ip}\",\"method\":\"{method}\",\"path\":\"{path}\"}}\n"
    )
}
