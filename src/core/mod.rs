//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod config;
pub mod error;
pub mod exception;
pub mod format;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod worker_pool;

pub use appender::Appender;
pub use caller::{stack_text, CallerLocation};
pub use config::{FileSinks, LogOptions, LoggerSpec, LoggingConfig, SinkKind, SinkSpec};
pub use error::{LoggerError, Result};
pub use exception::ExceptionInfo;
pub use format::{Formatter, FormatterSpec, DEFAULT_DATE_FORMAT, DEFAULT_TEMPLATE};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, Route};
pub use metrics::LoggerMetrics;
pub use registry::Registry;
pub use worker_pool::{LogHandle, WorkerPool};
