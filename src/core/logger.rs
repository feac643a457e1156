//! Wired logging backend
//!
//! A [`Logger`] is one complete, immutable wiring: the sinks, each with its
//! own minimum level, and the routes mapping logger names onto sinks. The
//! registry swaps whole `Logger`s, so a record is always written against a
//! single consistent wiring.

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};

struct Sink {
    name: String,
    min_level: LogLevel,
    appender: Mutex<Box<dyn Appender>>,
}

/// Logger-name route: records under `name` at or above `level` go to `sinks`
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    level: LogLevel,
    sinks: Vec<usize>,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// The empty name is the root and matches everything
    fn matches(&self, logger: &str) -> bool {
        self.name.is_empty()
            || logger == self.name
            || logger
                .strip_prefix(self.name.as_str())
                .is_some_and(|rest| rest.starts_with("::"))
    }
}

pub struct Logger {
    sinks: Vec<Sink>,
    /// Sorted longest name first so the first match is the most specific
    routes: Vec<Route>,
    metrics: LoggerMetrics,
    has_console: bool,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use aelog::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .sink("console", LogLevel::Debug, ConsoleAppender::stdout())
    ///     .route("", LogLevel::Info, ["console"])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.sink_names(), vec!["console"]);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Backend with no sinks or routes; every record is filtered
    pub(crate) fn empty() -> Self {
        Self {
            sinks: Vec::new(),
            routes: Vec::new(),
            metrics: LoggerMetrics::new(),
            has_console: false,
        }
    }

    /// Most specific route for a logger name
    pub fn route_for(&self, logger: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.matches(logger))
    }

    /// Whether a record at `level` from `logger` would reach any sink
    pub fn enabled(&self, level: LogLevel, logger: &str) -> bool {
        self.route_for(logger).is_some_and(|route| {
            level >= route.level
                && route.sinks.iter().any(|&idx| level >= self.sinks[idx].min_level)
        })
    }

    /// Write a record to every sink that admits it
    ///
    /// Returns the number of sinks that wrote the record. Sink failures and
    /// panics are contained here; each sink is isolated from the others.
    pub fn log_entry(&self, entry: &LogEntry) -> usize {
        let Some(route) = self.route_for(&entry.logger) else {
            self.metrics.record_filtered();
            return 0;
        };
        if entry.level < route.level {
            self.metrics.record_filtered();
            return 0;
        }

        let mut written = 0;
        let mut has_error = false;
        let mut admitted = false;

        for &idx in &route.sinks {
            let sink = &self.sinks[idx];
            if entry.level < sink.min_level {
                continue;
            }
            admitted = true;

            let mut appender = sink.appender.lock();
            let result = catch_unwind(AssertUnwindSafe(|| {
                appender.append(entry)?;
                appender.flush()
            }));

            match result {
                Ok(Ok(())) => written += 1,
                Ok(Err(e)) => {
                    has_error = true;
                    self.report(&format!("Sink '{}' failed: {}", sink.name, e));
                }
                Err(panic_info) => {
                    has_error = true;
                    self.report(&format!(
                        "Sink '{}' panicked: {}. Other sinks continue to function.",
                        sink.name,
                        panic_message(panic_info.as_ref())
                    ));
                }
            }
        }

        if !admitted {
            self.metrics.record_filtered();
        } else if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
        written
    }

    /// Best-effort failure report; silent unless a console sink is wired
    fn report(&self, message: &str) {
        if self.has_console {
            eprintln!("[LOGGER ERROR] {}", message);
            self.metrics.record_reported();
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn has_console(&self) -> bool {
        self.has_console
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for sink in &self.sinks {
            let _ = sink.appender.lock().flush();
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder assembling sinks and routes into a [`Logger`]
pub struct LoggerBuilder {
    sinks: Vec<(String, LogLevel, Box<dyn Appender>)>,
    routes: Vec<(String, LogLevel, Vec<String>)>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Add a named sink admitting records at or above `min_level`
    #[must_use = "builder methods return a new value"]
    pub fn sink<A: Appender + 'static>(
        self,
        name: impl Into<String>,
        min_level: LogLevel,
        appender: A,
    ) -> Self {
        self.boxed_sink(name, min_level, Box::new(appender))
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_sink(
        mut self,
        name: impl Into<String>,
        min_level: LogLevel,
        appender: Box<dyn Appender>,
    ) -> Self {
        self.sinks.push((name.into(), min_level, appender));
        self
    }

    /// Route records from logger `name` (and its `::` children) to `sinks`
    #[must_use = "builder methods return a new value"]
    pub fn route<I, S>(mut self, name: impl Into<String>, level: LogLevel, sinks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routes.push((
            name.into(),
            level,
            sinks.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for duplicate sink or route names and
    /// for routes naming sinks that were never added.
    pub fn build(self) -> Result<Logger> {
        let mut sinks: Vec<Sink> = Vec::with_capacity(self.sinks.len());
        for (name, min_level, appender) in self.sinks {
            if sinks.iter().any(|s| s.name == name) {
                return Err(LoggerError::config(
                    format!("sink '{}'", name),
                    "declared more than once",
                ));
            }
            sinks.push(Sink {
                name,
                min_level,
                appender: Mutex::new(appender),
            });
        }

        let mut routes: Vec<Route> = Vec::with_capacity(self.routes.len());
        for (name, level, sink_names) in self.routes {
            if routes.iter().any(|r| r.name == name) {
                return Err(LoggerError::config(
                    format!("logger '{}'", name),
                    "declared more than once",
                ));
            }
            let mut indices = Vec::with_capacity(sink_names.len());
            for sink_name in &sink_names {
                let idx = sinks.iter().position(|s| &s.name == sink_name).ok_or_else(|| {
                    LoggerError::config(
                        format!("logger '{}'", name),
                        format!("unknown sink '{}'", sink_name),
                    )
                })?;
                if !indices.contains(&idx) {
                    indices.push(idx);
                }
            }
            routes.push(Route {
                name,
                level,
                sinks: indices,
            });
        }
        routes.sort_by(|a, b| b.name.len().cmp(&a.name.len()));

        let has_console = sinks.iter().any(|s| s.appender.lock().is_console());

        Ok(Logger {
            sinks,
            routes,
            metrics: LoggerMetrics::new(),
            has_console,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
