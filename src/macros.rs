//! Logging macros
//!
//! Every macro captures the call site (file, line, enclosing function) and
//! uses the calling module's path as the logger name. Arguments are
//! stringified with `Display` and joined with a single space, or with the
//! separator given as `sep = ...` in first position.
//!
//! # Examples
//!
//! ```
//! use aelog::{info, warning};
//!
//! // Basic logging
//! info!("Server started");
//!
//! // Several values, joined with a space
//! let port = 8080;
//! info!("Server listening on port", port);
//!
//! // Custom separator
//! warning!(sep = ", ", "disk", "cpu", "memory");
//! ```

/// Call-site location of the macro invocation
#[doc(hidden)]
#[macro_export]
macro_rules! __caller {
    () => {{
        fn __aelog_marker() {}
        $crate::core::caller::CallerLocation::from_marker(
            file!(),
            line!(),
            $crate::core::caller::type_name_of(__aelog_marker),
        )
    }};
}

/// Render macro arguments into the message text
#[doc(hidden)]
#[macro_export]
macro_rules! __render {
    (sep = $sep:expr, $($arg:expr),+ $(,)?) => {
        $crate::facade::render_message(&[$(&$arg as &dyn ::std::fmt::Display),+], $sep)
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::facade::render_message(
            &[$(&$arg as &dyn ::std::fmt::Display),+],
            $crate::facade::DEFAULT_SEPARATOR,
        )
    };
}

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// use aelog::{log, LogLevel};
/// log!(LogLevel::Info, "Simple message");
/// log!(LogLevel::Error, "Error code:", 500);
/// log!(LogLevel::Warning, sep = "=", "retries", 3);
/// ```
#[macro_export]
macro_rules! log {
    ($level:expr, $($arg:tt)+) => {
        $crate::facade::log(
            $level,
            module_path!(),
            $crate::__caller!(),
            $crate::__render!($($arg)+),
        )
    };
}

/// Log a debug-level message.
///
/// ```
/// use aelog::debug;
/// debug!("Counter value:", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// ```
/// use aelog::info;
/// info!("Processing", 100, "items");
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// use aelog::warning;
/// warning!("Retry attempt", 3, "of", 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
///
/// ```
/// use aelog::error;
/// error!(sep = ": ", "Failed to connect", "connection refused");
/// ```
#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
///
/// ```
/// use aelog::critical;
/// critical!("Unable to recover from error:", "disk full");
/// ```
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Critical, $($arg)+)
    };
}

/// Log an error value with its cause chain and stack at ERROR.
///
/// Without further arguments the error's own text is the message.
///
/// ```
/// use aelog::exception;
///
/// if let Err(err) = "forty-two".parse::<u32>() {
///     exception!(&err, "could not parse the retry count");
/// }
/// ```
#[macro_export]
macro_rules! exception {
    ($err:expr $(,)?) => {{
        let __err = $err;
        $crate::facade::log_exception(
            module_path!(),
            $crate::__caller!(),
            __err,
            ::std::string::ToString::to_string(__err),
        )
    }};
    ($err:expr, $($arg:tt)+) => {
        $crate::facade::log_exception(
            module_path!(),
            $crate::__caller!(),
            $err,
            $crate::__render!($($arg)+),
        )
    };
}

/// Non-blocking [`log!`]; returns a [`LogHandle`](crate::LogHandle).
///
/// ```
/// use aelog::{async_log, LogLevel};
/// let handle = async_log!(LogLevel::Info, "queued");
/// handle.wait().unwrap();
/// ```
#[macro_export]
macro_rules! async_log {
    ($level:expr, $($arg:tt)+) => {
        $crate::facade::log_async(
            $level,
            module_path!(),
            $crate::__caller!(),
            $crate::__render!($($arg)+),
        )
    };
}

/// Non-blocking [`debug!`].
#[macro_export]
macro_rules! async_debug {
    ($($arg:tt)+) => {
        $crate::async_log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Non-blocking [`info!`].
///
/// ```
/// # tokio_test::block_on(async {
/// use aelog::async_info;
/// async_info!("request served in", 12, "ms").await.unwrap();
/// # });
/// ```
#[macro_export]
macro_rules! async_info {
    ($($arg:tt)+) => {
        $crate::async_log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Non-blocking [`warning!`].
#[macro_export]
macro_rules! async_warning {
    ($($arg:tt)+) => {
        $crate::async_log!($crate::LogLevel::Warning, $($arg)+)
    };
}

/// Non-blocking [`error!`].
#[macro_export]
macro_rules! async_error {
    ($($arg:tt)+) => {
        $crate::async_log!($crate::LogLevel::Error, $($arg)+)
    };
}

/// Non-blocking [`critical!`].
#[macro_export]
macro_rules! async_critical {
    ($($arg:tt)+) => {
        $crate::async_log!($crate::LogLevel::Critical, $($arg)+)
    };
}

/// Non-blocking [`exception!`]; the stack is captured before returning.
#[macro_export]
macro_rules! async_exception {
    ($err:expr $(,)?) => {{
        let __err = $err;
        $crate::facade::log_exception_async(
            module_path!(),
            $crate::__caller!(),
            __err,
            ::std::string::ToString::to_string(__err),
        )
    }};
    ($err:expr, $($arg:tt)+) => {
        $crate::facade::log_exception_async(
            module_path!(),
            $crate::__caller!(),
            $err,
            $crate::__render!($($arg)+),
        )
    };
}

/// Deprecated accessor for a logger bound to the calling module.
///
/// Emits a one-time WARNING record; prefer the leveled macros.
#[macro_export]
macro_rules! get_logger {
    () => {{
        #[allow(deprecated)]
        let __logger = $crate::facade::get_logger(module_path!());
        __logger
    }};
}
