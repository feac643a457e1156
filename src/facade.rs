//! Free-function call surface over the global registry
//!
//! The macros in [`crate::macros`] are the usual way in: they capture the
//! call site and the module path, render the arguments and call into here.
//! The functions are public so hosts with their own call-site capture can
//! use them directly.

use crate::core::caller::CallerLocation;
use crate::core::config::LogOptions;
use crate::core::error::Result;
use crate::core::exception::ExceptionInfo;
use crate::core::log_entry::LogEntry;
use crate::core::log_level::LogLevel;
use crate::core::registry::Registry;
use crate::core::worker_pool::{LogHandle, WorkerPool};
use std::error::Error;
use std::fmt::{self, Display, Write as _};
use std::sync::Once;

/// Separator used when a call does not name one
pub const DEFAULT_SEPARATOR: &str = " ";

/// Configure the global backend; every call fully replaces the wiring
///
/// # Errors
///
/// Returns a configuration error and keeps the previous wiring when the new
/// one cannot be built.
///
/// # Examples
///
/// ```no_run
/// use aelog::{LogLevel, LogOptions};
///
/// aelog::configure(
///     &LogOptions::new()
///         .access_file("logs/service.log")
///         .console(true)
///         .level(LogLevel::Info),
/// )?;
/// # Ok::<(), aelog::LoggerError>(())
/// ```
pub fn configure(options: &LogOptions) -> Result<()> {
    Registry::global().configure(options)
}

/// Apply the console defaults unless the global backend is configured
pub fn ensure_configured() {
    Registry::global().ensure_configured();
}

/// Whether a record would reach any sink of the current global wiring
pub fn enabled(level: LogLevel, target: &str) -> bool {
    let registry = Registry::global();
    registry.ensure_configured();
    registry.active().enabled(level, target)
}

/// Stringify every argument and join them with `sep`
///
/// ```
/// use aelog::facade::render_message;
///
/// assert_eq!(render_message(&[&"retry", &3, &"of", &5], " "), "retry 3 of 5");
/// assert_eq!(render_message(&[&"a", &"b"], ", "), "a, b");
/// ```
pub fn render_message(args: &[&dyn Display], sep: &str) -> String {
    let mut message = String::new();
    for (idx, arg) in args.iter().enumerate() {
        if idx > 0 {
            message.push_str(sep);
        }
        // Writing into a String cannot fail
        let _ = write!(message, "{}", arg);
    }
    message
}

/// Write a record synchronously through the global backend
pub fn log(level: LogLevel, target: &str, location: CallerLocation, message: impl AsRef<str>) {
    let entry = LogEntry::new(level, target, message).with_location(location);
    Registry::global().log(&entry);
}

/// Hand a record to the global worker pool
///
/// Records from concurrent or back-to-back calls may be written in any
/// order.
pub fn log_async(
    level: LogLevel,
    target: &str,
    location: CallerLocation,
    message: impl AsRef<str>,
) -> LogHandle {
    let entry = LogEntry::new(level, target, message).with_location(location);
    Registry::global().log_async(WorkerPool::global(), entry)
}

/// Write `error` and its context at ERROR severity
///
/// The stack is captured here, on the calling thread.
pub fn log_exception<E>(target: &str, location: CallerLocation, error: &E, message: impl AsRef<str>)
where
    E: Error + ?Sized + 'static,
{
    let entry = exception_entry(target, location, error, message);
    Registry::global().log(&entry);
}

/// Asynchronous form of [`log_exception`]; the stack is still captured on
/// the calling thread
pub fn log_exception_async<E>(
    target: &str,
    location: CallerLocation,
    error: &E,
    message: impl AsRef<str>,
) -> LogHandle
where
    E: Error + ?Sized + 'static,
{
    let entry = exception_entry(target, location, error, message);
    Registry::global().log_async(WorkerPool::global(), entry)
}

fn exception_entry<E>(
    target: &str,
    location: CallerLocation,
    error: &E,
    message: impl AsRef<str>,
) -> LogEntry
where
    E: Error + ?Sized + 'static,
{
    let exception = ExceptionInfo::capture(error, &location);
    LogEntry::new(LogLevel::Error, target, message)
        .with_location(location)
        .with_exception(exception)
}

static GET_LOGGER_WARNING: Once = Once::new();

/// Handle bound to a module's logger name
///
/// # Examples
///
/// ```
/// # #![allow(deprecated)]
/// let logger = aelog::facade::get_logger("app::billing");
/// logger.info("invoice sent");
/// ```
#[deprecated(note = "call the logging macros directly; they resolve the module themselves")]
#[track_caller]
pub fn get_logger(target: &str) -> ModuleLogger {
    let location = CallerLocation::caller();
    GET_LOGGER_WARNING.call_once(|| {
        log(
            LogLevel::Warning,
            target,
            location,
            "get_logger is deprecated, call the logging macros directly",
        );
    });
    ModuleLogger::new(target)
}

/// Logger bound to one name, returned by [`get_logger`] and `get_logger!`
///
/// Its methods attribute records through `#[track_caller]`: file and line
/// are exact, the enclosing function is not known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLogger {
    name: String,
}

impl ModuleLogger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        log(level, &self.name, CallerLocation::caller(), message);
    }

    #[track_caller]
    pub fn log_async(&self, level: LogLevel, message: impl AsRef<str>) -> LogHandle {
        log_async(level, &self.name, CallerLocation::caller(), message)
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Critical, message);
    }

    #[track_caller]
    pub fn exception<E>(&self, error: &E, message: impl AsRef<str>)
    where
        E: Error + ?Sized + 'static,
    {
        log_exception(&self.name, CallerLocation::caller(), error, message);
    }
}

impl fmt::Display for ModuleLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
