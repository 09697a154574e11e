//! Observability for documents and validators
//!
//! - Structured logging (JSON lines)
//! - Typed lifecycle events
//!
//! Logging is a capability handed to each component as an
//! `Arc<dyn Logger>`. It never changes control flow or return values.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use docbind::observability::{log_event, Event, JsonLogger, Logger};
//!
//! let logger: Arc<dyn Logger> = Arc::new(JsonLogger::default());
//! log_event(logger.as_ref(), Event::DocumentLoaded, &[("file", "data.json")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{render_line, JsonLogger, Logger, MemoryLogger, NullLogger, Severity};

use std::sync::Arc;

/// Returns a logger that discards everything.
pub fn null_logger() -> Arc<dyn Logger> {
    Arc::new(NullLogger)
}

/// Log a lifecycle event with fields
pub fn log_event(logger: &dyn Logger, event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_failure() {
        Severity::Error
    } else {
        Severity::Info
    };
    logger.log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event_severity() {
        let logger = MemoryLogger::new();
        log_event(&logger, Event::DocumentLoadFailed, &[("file", "x.json")]);
        log_event(&logger, Event::DocumentLoaded, &[]);

        let lines = logger.lines();
        assert!(lines[0].contains("\"severity\":\"ERROR\""));
        assert!(lines[1].contains("\"severity\":\"INFO\""));
    }

    #[test]
    fn test_null_logger_is_silent() {
        let logger = null_logger();
        log_event(logger.as_ref(), Event::SchemaLoaded, &[]);
    }
}
