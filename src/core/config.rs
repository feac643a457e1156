//! Configuration: initialization options and the wiring they expand into
//!
//! [`LogOptions`] is what an application passes to `configure`. It expands
//! into a [`LoggingConfig`], a declarative description of named formatters,
//! named sinks and logger routes, which is then built into a live
//! [`Logger`]. Hosts that need wiring the options cannot express can hand a
//! `LoggingConfig` to the registry directly.

use super::error::{LoggerError, Result};
use super::format::{Formatter, FormatterSpec};
use super::log_level::LogLevel;
use super::logger::Logger;
use crate::appenders::rotating_file::{
    derive_error_path, normalize_log_path, DEFAULT_BACKUP_COUNT, DEFAULT_MAX_BYTES,
};
use crate::appenders::{ConsoleAppender, ConsoleStream, RotatingFileAppender, RotationPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_FORMATTER: &str = "aelog_default";
pub const PLAIN_FORMATTER: &str = "aelog_plain";
pub const CONSOLE_SINK: &str = "aelog_console";
pub const ERROR_CONSOLE_SINK: &str = "aelog_error_console";
pub const ACCESS_FILE_SINK: &str = "aelog_access_file";
pub const ERROR_FILE_SINK: &str = "aelog_error_file";
pub const ROOT_LOGGER: &str = "";

const DEFAULT_ENCODING: &str = "utf-8";

/// Options accepted by `configure`
///
/// # Examples
///
/// ```
/// use aelog::{LogLevel, LogOptions};
///
/// let options = LogOptions::new()
///     .access_file("logs/app.log")
///     .console(true)
///     .level(LogLevel::Info)
///     .max_bytes(10 * 1024 * 1024)
///     .backup_count(3);
/// assert_eq!(options.backup_count, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// Access log path; `None` logs to the console only
    pub access_file: Option<PathBuf>,
    /// Error log path; derived from `access_file` when absent
    pub error_file: Option<PathBuf>,
    /// Also log to stdout when file sinks are configured
    pub console: bool,
    pub level: LogLevel,
    pub max_bytes: u64,
    pub backup_count: usize,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            access_file: None,
            error_file: None,
            console: false,
            level: LogLevel::Debug,
            max_bytes: DEFAULT_MAX_BYTES,
            backup_count: DEFAULT_BACKUP_COUNT,
        }
    }
}

impl LogOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn access_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.access_file = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.error_file = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the level from its name, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns `InvalidLevel` for names outside the five severities.
    pub fn level_name(mut self, name: &str) -> Result<Self> {
        self.level = name.parse()?;
        Ok(self)
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn backup_count(mut self, count: usize) -> Self {
        self.backup_count = count;
        self
    }

    /// Parse options from a host's JSON settings
    ///
    /// # Errors
    ///
    /// Returns `JsonError` for malformed documents or unknown level names.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Kind-specific part of a sink definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SinkKind {
    Console {
        #[serde(default)]
        stream: ConsoleStream,
    },
    RotatingFile {
        path: PathBuf,
        max_bytes: u64,
        backup_count: usize,
        #[serde(default = "default_encoding")]
        encoding: String,
    },
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

/// Named sink definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkSpec {
    #[serde(flatten)]
    pub kind: SinkKind,
    /// Minimum severity the sink admits
    pub level: LogLevel,
    /// Name of the formatter in the same configuration
    pub formatter: String,
}

impl SinkSpec {
    pub fn console(stream: ConsoleStream, level: LogLevel) -> Self {
        Self {
            kind: SinkKind::Console { stream },
            level,
            formatter: DEFAULT_FORMATTER.to_string(),
        }
    }

    pub fn rotating_file(path: impl Into<PathBuf>, level: LogLevel, policy: &RotationPolicy) -> Self {
        Self {
            kind: SinkKind::RotatingFile {
                path: normalize_log_path(&path.into()),
                max_bytes: policy.max_bytes,
                backup_count: policy.max_backup_files,
                encoding: default_encoding(),
            },
            level,
            formatter: PLAIN_FORMATTER.to_string(),
        }
    }
}

/// Logger route definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSpec {
    pub level: LogLevel,
    pub sinks: Vec<String>,
}

/// Access and error file sinks derived from one access path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSinks {
    pub access: SinkSpec,
    pub error: SinkSpec,
}

impl FileSinks {
    /// Build the access/error sink pair
    ///
    /// The access sink admits INFO and above, the error sink ERROR and
    /// above. The error path is derived as `<stem>_error.<ext>` when absent.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when `max_bytes` is zero.
    pub fn build(
        access_file: &std::path::Path,
        error_file: Option<&std::path::Path>,
        max_bytes: u64,
        backup_count: usize,
    ) -> Result<Self> {
        let policy = RotationPolicy::new()
            .with_max_size(max_bytes)
            .with_max_backups(backup_count);
        policy.validate()?;

        let access_path = normalize_log_path(access_file);
        let error_path = match error_file {
            Some(path) => normalize_log_path(path),
            None => derive_error_path(&access_path),
        };

        Ok(Self {
            access: SinkSpec::rotating_file(access_path, LogLevel::Info, &policy),
            error: SinkSpec::rotating_file(error_path, LogLevel::Error, &policy),
        })
    }
}

/// Complete declarative wiring: formatters, sinks and logger routes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub formatters: BTreeMap<String, FormatterSpec>,
    pub sinks: BTreeMap<String, SinkSpec>,
    pub loggers: BTreeMap<String, LoggerSpec>,
}

impl LoggingConfig {
    /// Console-only wiring used before anything is configured
    pub fn console_defaults(level: LogLevel) -> Self {
        let mut config = Self::with_standard_formatters();
        config.sinks.insert(
            CONSOLE_SINK.to_string(),
            SinkSpec::console(ConsoleStream::Stdout, LogLevel::Debug),
        );
        config.sinks.insert(
            ERROR_CONSOLE_SINK.to_string(),
            SinkSpec::console(ConsoleStream::Stderr, LogLevel::Error),
        );
        config.loggers.insert(
            ROOT_LOGGER.to_string(),
            LoggerSpec {
                level,
                sinks: vec![CONSOLE_SINK.to_string(), ERROR_CONSOLE_SINK.to_string()],
            },
        );
        config
    }

    /// Expand initialization options into a full wiring
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for an invalid rotation policy.
    pub fn from_options(options: &LogOptions) -> Result<Self> {
        let Some(ref access_file) = options.access_file else {
            return Ok(Self::console_defaults(options.level));
        };

        let files = FileSinks::build(
            access_file,
            options.error_file.as_deref(),
            options.max_bytes,
            options.backup_count,
        )?;

        let mut config = Self::with_standard_formatters();
        let mut root_sinks = Vec::new();
        if options.console {
            config.sinks.insert(
                CONSOLE_SINK.to_string(),
                SinkSpec::console(ConsoleStream::Stdout, LogLevel::Debug),
            );
            root_sinks.push(CONSOLE_SINK.to_string());
        }
        config.sinks.insert(ACCESS_FILE_SINK.to_string(), files.access);
        config.sinks.insert(ERROR_FILE_SINK.to_string(), files.error);
        root_sinks.push(ACCESS_FILE_SINK.to_string());
        root_sinks.push(ERROR_FILE_SINK.to_string());

        config.loggers.insert(
            ROOT_LOGGER.to_string(),
            LoggerSpec {
                level: options.level,
                sinks: root_sinks,
            },
        );
        Ok(config)
    }

    fn with_standard_formatters() -> Self {
        let mut config = Self::default();
        config
            .formatters
            .insert(DEFAULT_FORMATTER.to_string(), FormatterSpec::colored());
        config
            .formatters
            .insert(PLAIN_FORMATTER.to_string(), FormatterSpec::default());
        config
    }

    /// Build the live backend, opening every file sink
    ///
    /// Nothing global is touched here; a failure leaves the active wiring
    /// as it was.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for dangling references, bad templates,
    /// invalid policies, unsupported encodings or unopenable files.
    pub fn build(&self) -> Result<Logger> {
        let mut formatters = BTreeMap::new();
        for (name, spec) in &self.formatters {
            let formatter = Formatter::compile(spec).map_err(|e| {
                LoggerError::config(format!("formatter '{}'", name), e.to_string())
            })?;
            formatters.insert(name.as_str(), formatter);
        }

        let mut builder = Logger::builder();
        for (name, spec) in &self.sinks {
            let component = format!("sink '{}'", name);
            let formatter = formatters
                .get(spec.formatter.as_str())
                .cloned()
                .ok_or_else(|| {
                    LoggerError::config(
                        component.clone(),
                        format!("unknown formatter '{}'", spec.formatter),
                    )
                })?;

            builder = match spec.kind {
                SinkKind::Console { stream } => builder.sink(
                    name.clone(),
                    spec.level,
                    ConsoleAppender::new(stream, formatter),
                ),
                SinkKind::RotatingFile {
                    ref path,
                    max_bytes,
                    backup_count,
                    ref encoding,
                } => {
                    if !is_utf8_label(encoding) {
                        return Err(LoggerError::config(
                            component,
                            format!("unsupported encoding '{}', only UTF-8 is written", encoding),
                        ));
                    }
                    let policy = RotationPolicy::new()
                        .with_max_size(max_bytes)
                        .with_max_backups(backup_count);
                    let appender = RotatingFileAppender::with_policy(path, policy)
                        .map_err(|e| LoggerError::config(component, e.to_string()))?
                        .with_formatter(formatter);
                    builder.sink(name.clone(), spec.level, appender)
                }
            };
        }

        for (name, spec) in &self.loggers {
            builder = builder.route(name.clone(), spec.level, spec.sinks.iter().cloned());
        }
        builder.build()
    }

    /// # Errors
    ///
    /// Returns `JsonError` if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns `JsonError` for malformed documents or unknown level names.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn is_utf8_label(encoding: &str) -> bool {
    matches!(
        encoding.to_ascii_lowercase().replace(['-', '_'], "").as_str(),
        "utf8"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_default_options() {
        let options = LogOptions::default();
        assert_eq!(options.access_file, None);
        assert!(!options.console);
        assert_eq!(options.level, LogLevel::Debug);
        assert_eq!(options.max_bytes, 50 * 1024 * 1024);
        assert_eq!(options.backup_count, 5);
    }

    #[test]
    fn test_level_name_validation() {
        let options = LogOptions::new().level_name("warning").unwrap();
        assert_eq!(options.level, LogLevel::Warning);
        assert!(LogOptions::new().level_name("loud").is_err());
    }

    #[test]
    fn test_options_from_json() {
        let options = LogOptions::from_json(
            r#"{"access_file": "app.log", "console": true, "level": "info"}"#,
        )
        .unwrap();
        assert_eq!(options.access_file, Some(PathBuf::from("app.log")));
        assert!(options.console);
        assert_eq!(options.level, LogLevel::Info);
        assert_eq!(options.backup_count, 5);

        let err = LogOptions::from_json(r#"{"level": "chatty"}"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_console_only_when_no_access_file() {
        let config = LoggingConfig::from_options(&LogOptions::default()).unwrap();
        assert_eq!(
            config.sinks.keys().collect::<Vec<_>>(),
            vec![CONSOLE_SINK, ERROR_CONSOLE_SINK]
        );
        let root = &config.loggers[ROOT_LOGGER];
        assert_eq!(root.level, LogLevel::Debug);
        assert_eq!(config.sinks[ERROR_CONSOLE_SINK].level, LogLevel::Error);
    }

    #[test]
    fn test_file_sinks_with_derived_error_path() {
        let files = FileSinks::build(Path::new("app.log"), None, 1024, 2).unwrap();
        assert_eq!(
            files.error.kind,
            SinkKind::RotatingFile {
                path: PathBuf::from("app_error.log"),
                max_bytes: 1024,
                backup_count: 2,
                encoding: "utf-8".to_string(),
            }
        );
        assert_eq!(files.access.level, LogLevel::Info);
        assert_eq!(files.error.level, LogLevel::Error);
    }

    #[test]
    fn test_explicit_error_path_is_normalized() {
        let files =
            FileSinks::build(Path::new("app.log"), Some(Path::new("failures")), 1024, 2).unwrap();
        match files.error.kind {
            SinkKind::RotatingFile { ref path, .. } => assert_eq!(path, Path::new("failures.log")),
            ref other => panic!("unexpected sink kind {:?}", other),
        }
    }

    #[test]
    fn test_zero_max_bytes_is_configuration_error() {
        let options = LogOptions::new().access_file("app.log").max_bytes(0);
        let err = LoggingConfig::from_options(&options).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_file_options_wiring() {
        let options = LogOptions::new()
            .access_file("svc.log")
            .console(true)
            .level(LogLevel::Warning);
        let config = LoggingConfig::from_options(&options).unwrap();

        let root = &config.loggers[ROOT_LOGGER];
        assert_eq!(root.level, LogLevel::Warning);
        assert_eq!(root.sinks, vec![CONSOLE_SINK, ACCESS_FILE_SINK, ERROR_FILE_SINK]);
        assert_eq!(config.sinks[ACCESS_FILE_SINK].formatter, PLAIN_FORMATTER);
        assert_eq!(config.sinks[CONSOLE_SINK].formatter, DEFAULT_FORMATTER);

        let without_console = LoggingConfig::from_options(&options.console(false)).unwrap();
        assert!(!without_console.sinks.contains_key(CONSOLE_SINK));
    }

    #[test]
    fn test_build_opens_files() {
        let dir = tempdir().unwrap();
        let access = dir.path().join("app.log");
        let config =
            LoggingConfig::from_options(&LogOptions::new().access_file(&access)).unwrap();

        let logger = config.build().unwrap();
        assert!(access.exists());
        assert!(dir.path().join("app_error.log").exists());
        assert!(!logger.has_console());
    }

    #[test]
    fn test_build_rejects_dangling_formatter() {
        let mut config = LoggingConfig::console_defaults(LogLevel::Info);
        config.sinks.get_mut(CONSOLE_SINK).unwrap().formatter = "missing".to_string();
        let err = config.build().err().expect("dangling formatter must fail");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_build_rejects_other_encodings() {
        let dir = tempdir().unwrap();
        let mut config = LoggingConfig::from_options(
            &LogOptions::new().access_file(dir.path().join("enc.log")),
        )
        .unwrap();
        if let SinkKind::RotatingFile { ref mut encoding, .. } =
            config.sinks.get_mut(ACCESS_FILE_SINK).unwrap().kind
        {
            *encoding = "latin-1".to_string();
        }
        assert!(config.build().is_err());
    }

    #[test]
    fn test_unwritable_path_is_configuration_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, b"file").unwrap();

        let config = LoggingConfig::from_options(
            &LogOptions::new().access_file(blocker.join("app.log")),
        )
        .unwrap();
        let err = config.build().err().expect("path under a file must fail");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_json_document_roundtrip() {
        let config = LoggingConfig::from_options(
            &LogOptions::new().access_file("app.log").console(true),
        )
        .unwrap();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"kind\": \"rotating_file\""));
        assert_eq!(LoggingConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_utf8_labels() {
        assert!(is_utf8_label("utf8"));
        assert!(is_utf8_label("UTF-8"));
        assert!(is_utf8_label("utf_8"));
        assert!(!is_utf8_label("gbk"));
    }
}
