//! Log sinks: destination streams that receive rendered records.

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Shared in-memory buffer target. Lets tests and embedders capture output.
pub type SharedBuf = Arc<Mutex<Vec<u8>>>;

/// Destination stream for one severity channel.
#[derive(Clone, Debug)]
pub enum SinkTarget {
    Stdout,
    Stderr,
    Shared(SharedBuf),
}

/// One channel binding: a target stream plus the debug-mode line decoration
/// (prefix label and timestamped line header).
#[derive(Clone, Debug)]
pub struct Sink {
    target: SinkTarget,
    prefix: &'static str,
    line_header: bool,
}

impl Sink {
    pub fn new(target: SinkTarget, prefix: &'static str, line_header: bool) -> Self {
        Self {
            target,
            prefix,
            line_header,
        }
    }

    /// Write one rendered record, prepending the prefix and (when enabled)
    /// a `YYYY/MM/DD HH:MM:SS` line header.
    ///
    /// The target is locked for the duration of the write, so concurrent
    /// records never interleave within a single record. Write errors are
    /// swallowed: a log sink is assumed to never fail in a way the caller
    /// could act on.
    pub fn write_record(&self, body: &str) {
        let mut line = String::with_capacity(self.prefix.len() + 20 + body.len());
        line.push_str(self.prefix);
        if self.line_header {
            line.push_str(&chrono::Local::now().format("%Y/%m/%d %H:%M:%S ").to_string());
        }
        line.push_str(body);

        match &self.target {
            SinkTarget::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                let _ = handle.write_all(line.as_bytes());
            }
            SinkTarget::Stderr => {
                let stderr = std::io::stderr();
                let mut handle = stderr.lock();
                let _ = handle.write_all(line.as_bytes());
            }
            SinkTarget::Shared(buf) => {
                let mut guard = buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                guard.extend_from_slice(line.as_bytes());
            }
        }
    }
}
