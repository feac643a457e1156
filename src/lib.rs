//! # aelog
//!
//! Process-wide logging facade: one lazily configured global backend with
//! console and size-rotated file outputs, colored severity levels and
//! caller attribution, called through leveled macros in a direct and a
//! non-blocking form.
//!
//! ## Features
//!
//! - **Zero setup**: the first record configures console output if nothing
//!   else was configured
//! - **Rotating files**: access log plus a derived `_error` log, both
//!   rotated by size with numbered backups
//! - **Caller attribution**: file, line and function of the logging call;
//!   the logger name is the calling module's path
//! - **Non-blocking form**: writes handed to a worker pool, with an
//!   awaitable handle
//!
//! ```no_run
//! use aelog::{exception, info, LogOptions};
//!
//! aelog::configure(&LogOptions::new().access_file("logs/app.log").console(true))?;
//! info!("service started on port", 8080);
//!
//! if let Err(err) = std::fs::read("missing.toml") {
//!     exception!(&err, "could not read settings");
//! }
//! # Ok::<(), aelog::LoggerError>(())
//! ```

pub mod appenders;
pub mod core;
pub mod facade;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, ConsoleStream, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        Appender, CallerLocation, ExceptionInfo, Formatter, FormatterSpec, LogEntry, LogHandle,
        LogLevel, LogOptions, Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggingConfig,
        Registry, Result, WorkerPool,
    };
    pub use crate::facade::ModuleLogger;
    pub use crate::{
        async_critical, async_debug, async_error, async_exception, async_info, async_log,
        async_warning, critical, debug, error, exception, info, log, warning,
    };
}

pub use appenders::{ConsoleAppender, ConsoleStream, RotatingFileAppender, RotationPolicy};
pub use core::{
    Appender, CallerLocation, ExceptionInfo, Formatter, FormatterSpec, LogEntry, LogHandle,
    LogLevel, LogOptions, Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggingConfig,
    Registry, Result, WorkerPool,
};
pub use facade::{configure, ensure_configured, ModuleLogger};
