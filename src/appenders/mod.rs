//! Appender implementations

pub mod console;
pub mod rotating_file;

pub use console::{ConsoleAppender, ConsoleStream};
pub use rotating_file::{
    derive_error_path, normalize_log_path, RotatingFileAppender, RotationPolicy,
};

pub use crate::core::Appender;
