//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A sink: somewhere rendered records end up
///
/// Level filtering happens in the backend before `append` is called, so an
/// appender writes every record it receives.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Whether this appender writes to the process console
    ///
    /// Sink failures are only reported when a console appender is wired.
    fn is_console(&self) -> bool {
        false
    }
}
