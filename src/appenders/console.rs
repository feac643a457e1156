//! Console appender implementation

use crate::core::{Appender, Formatter, LogEntry, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Standard stream a console appender writes to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleStream {
    #[default]
    Stdout,
    Stderr,
}

pub struct ConsoleAppender {
    stream: ConsoleStream,
    formatter: Formatter,
}

impl ConsoleAppender {
    pub fn new(stream: ConsoleStream, formatter: Formatter) -> Self {
        Self { stream, formatter }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout, Formatter::default())
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr, Formatter::default())
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.formatter.format(entry);
        match self.stream {
            ConsoleStream::Stdout => writeln!(std::io::stdout().lock(), "{}", output)?,
            ConsoleStream::Stderr => writeln!(std::io::stderr().lock(), "{}", output)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => std::io::stdout().flush()?,
            ConsoleStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "console",
            ConsoleStream::Stderr => "error_console",
        }
    }

    fn is_console(&self) -> bool {
        true
    }
}
