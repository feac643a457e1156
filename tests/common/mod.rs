//! Shared helpers for the integration tests

#![allow(dead_code)]

use aelog::{Appender, LogEntry, LogLevel, Logger, Result};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Appender keeping every record in memory
#[derive(Clone, Default)]
pub struct Capture {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl Capture {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl Appender for Capture {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}

/// Backend writing everything at or above `level` into `capture`
pub fn capture_logger(level: LogLevel, capture: &Capture) -> Logger {
    Logger::builder()
        .sink("capture", LogLevel::Debug, capture.clone())
        .route("", level, ["capture"])
        .build()
        .expect("capture wiring builds")
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}
