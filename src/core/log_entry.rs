//! Log entry structure

use super::caller::CallerLocation;
use super::exception::ExceptionInfo;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// One log record, built on the calling thread and consumed by the sinks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Hierarchical logger name, the caller's module path
    pub logger: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub location: CallerLocation,
    pub thread_id: String,
    pub thread_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<ExceptionInfo>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, logger: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            level,
            logger: logger.into(),
            message: Self::sanitize_message(message.as_ref()),
            timestamp: Local::now(),
            location: CallerLocation::unknown(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            exception: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: CallerLocation) -> Self {
        self.location = location;
        self
    }

    /// Attach captured error context; the record is forced to ERROR
    #[must_use]
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.level = LogLevel::Error;
        self.exception = Some(exception);
        self
    }

    /// Thread label used by the `{thread}` template field
    pub fn thread_label(&self) -> &str {
        self.thread_name.as_deref().unwrap_or(&self.thread_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_sanitized() {
        let entry = LogEntry::new(LogLevel::Info, "app", "line one\nERROR fake\r\tend");
        assert_eq!(entry.message, "line one\\nERROR fake\\r\\tend");
    }

    #[test]
    fn test_defaults_to_unknown_location() {
        let entry = LogEntry::new(LogLevel::Debug, "app::db", "connected");
        assert!(entry.location.is_unknown());
        assert_eq!(entry.logger, "app::db");
        assert!(entry.exception.is_none());
    }

    #[test]
    fn test_exception_forces_error_level() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let info = ExceptionInfo::capture(&err, &CallerLocation::unknown());
        let entry = LogEntry::new(LogLevel::Critical, "app", "failed").with_exception(info);
        assert_eq!(entry.level, LogLevel::Error);
        assert!(entry.exception.is_some());
    }
}
