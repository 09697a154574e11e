//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields in alphabetical order
//! - Synchronous, no buffering
//! - Fire-and-forget: a failed write never surfaces to the caller
//!
//! Loggers are injected into the components that use them; there is no
//! process-wide logger instance.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Fine-grained detail
    Trace = 0,
    /// Diagnostic detail
    Debug = 1,
    /// Normal operations
    Info = 2,
    /// Recoverable issues
    Warn = 3,
    /// Operation failures
    Error = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic sink used by documents and validators.
pub trait Logger: Send + Sync {
    /// Record one event. Must never panic or report failure.
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]);

    fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    fn error(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }

    fn debug(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Debug, event, fields);
    }
}

/// Logger writing JSON lines to stdout, or stderr for errors.
#[derive(Debug, Clone)]
pub struct JsonLogger {
    min_severity: Severity,
    timestamps: bool,
}

impl Default for JsonLogger {
    fn default() -> Self {
        Self {
            min_severity: Severity::Info,
            timestamps: false,
        }
    }
}

impl JsonLogger {
    /// Create a logger that drops anything below `min_severity`.
    pub fn new(min_severity: Severity) -> Self {
        Self {
            min_severity,
            ..Self::default()
        }
    }

    /// Include an RFC 3339 `ts` field on every line.
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Returns the minimum severity that is written.
    pub fn min_severity(&self) -> Severity {
        self.min_severity
    }

    pub fn timestamps(&self) -> bool {
        self.timestamps
    }

    fn write_line<W: Write>(&self, line: &str, writer: &mut W) {
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

impl Logger for JsonLogger {
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < self.min_severity {
            return;
        }

        let ts = self
            .timestamps
            .then(|| chrono::Utc::now().to_rfc3339());
        let line = render_line(severity, event, fields, ts.as_deref());

        if severity >= Severity::Error {
            self.write_line(&line, &mut io::stderr());
        } else {
            self.write_line(&line, &mut io::stdout());
        }
    }
}

/// Logger that keeps every rendered line in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line captured so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Returns true if any captured line carries `event`.
    pub fn contains_event(&self, event: &str) -> bool {
        let needle = format!("\"event\":\"{}\"", event);
        self.lines().iter().any(|l| l.contains(&needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = render_line(severity, event, fields, None);
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

/// Logger that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _severity: Severity, _event: &str, _fields: &[(&str, &str)]) {}
}

/// Render one log line, newline terminated.
///
/// Fields are sorted by key so identical input always renders identically.
pub fn render_line(
    severity: Severity,
    event: &str,
    fields: &[(&str, &str)],
    ts: Option<&str>,
) -> String {
    let mut output = String::with_capacity(256);

    output.push('{');

    output.push_str("\"event\":\"");
    escape_json_string(&mut output, event);
    output.push('"');

    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    if let Some(ts) = ts {
        output.push_str(",\"ts\":\"");
        escape_json_string(&mut output, ts);
        output.push('"');
    }

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push('}');
    output.push('\n');
    output
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
