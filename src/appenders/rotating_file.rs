//! Rotating file appender with size-based rotation
//!
//! The active file is renamed into a ring of numbered backups
//! (`app.log.1` newest, `app.log.N` oldest) once the next record would push
//! it past the size cap, and a fresh file is opened in its place. Renaming
//! instead of truncating keeps readers holding the old file safe.

use crate::core::error::{LoggerError, Result};
use crate::core::{Appender, Formatter, LogEntry};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default size cap for a single log file (50 MiB)
pub const DEFAULT_MAX_BYTES: u64 = 50 * 1024 * 1024;

/// Default number of rotated backups kept
pub const DEFAULT_BACKUP_COUNT: usize = 5;

const LOG_EXTENSION: &str = "log";

/// Size cap and backup ring length for a rotating file
///
/// # Examples
///
/// ```
/// use aelog::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(10 * 1024 * 1024)
///     .with_max_backups(7);
/// assert!(policy.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum size of the active file in bytes
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep
    pub max_backup_files: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_backup_files: DEFAULT_BACKUP_COUNT,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_bytes = size;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backup_files = count;
        self
    }

    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when `max_bytes` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(LoggerError::config(
                "rotation policy",
                "max_bytes must be a positive number of bytes",
            ));
        }
        Ok(())
    }
}

/// Give a log path the `.log` extension when its file name has none
pub fn normalize_log_path(path: &Path) -> PathBuf {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return path.to_path_buf();
    };
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => path.to_path_buf(),
        _ => path.with_file_name(format!("{}.{}", name.trim_end_matches('.'), LOG_EXTENSION)),
    }
}

/// Companion error-file path: `dir/app.log` becomes `dir/app_error.log`
pub fn derive_error_path(access_path: &Path) -> PathBuf {
    let normalized = normalize_log_path(access_path);
    let name = normalized
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("aelog.log");
    let file_name = match name.rsplit_once('.') {
        Some((stem, ext)) => format!("{}_error.{}", stem, ext),
        None => format!("{}_error.{}", name, LOG_EXTENSION),
    };
    normalized.with_file_name(file_name)
}

/// Rotating file appender
///
/// # Examples
///
/// ```no_run
/// use aelog::appenders::{RotatingFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new().with_max_size(1024 * 1024).with_max_backups(3);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.log", policy).unwrap();
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    formatter: Formatter,
}

impl RotatingFileAppender {
    /// Create a new rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a new rotating file appender with custom policy
    ///
    /// # Errors
    ///
    /// Returns error if the policy is invalid or the file cannot be opened
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        policy.validate()?;
        let base_path = normalize_log_path(path.as_ref());

        if let Some(parent) = base_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_file(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            writer: Some(BufWriter::new(file)),
            current_size,
            formatter: Formatter::default(),
        })
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    fn open_file(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();
        Ok((file, size))
    }

    /// Whether writing `incoming` more bytes would exceed the cap
    ///
    /// An empty file always takes the record, however large.
    fn should_rotate(&self, incoming: u64) -> bool {
        self.current_size > 0 && self.current_size + incoming > self.policy.max_bytes
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.policy.max_backup_files == 0 {
            // No ring to keep: the full file is discarded
            if self.base_path.exists() {
                fs::remove_file(&self.base_path).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to discard full log file: {}", e),
                    )
                })?;
            }
        } else {
            let oldest = self.backup_path(self.policy.max_backup_files);
            if oldest.exists() {
                if let Err(e) = fs::remove_file(&oldest) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove oldest backup {}: {}",
                        oldest.display(),
                        e
                    );
                }
            }

            for i in (1..self.policy.max_backup_files).rev() {
                let old_path = self.backup_path(i);
                if !old_path.exists() {
                    continue;
                }
                let new_path = self.backup_path(i + 1);
                if fs::rename(&old_path, &new_path).is_err() {
                    // Some platforms refuse to rename over an existing file
                    if new_path.exists() {
                        let _ = fs::remove_file(&new_path);
                    }
                    fs::rename(&old_path, &new_path).map_err(|e| {
                        LoggerError::file_rotation(
                            old_path.display().to_string(),
                            format!("Failed to rotate backup files: {}", e),
                        )
                    })?;
                }
            }

            if self.base_path.exists() {
                fs::rename(&self.base_path, self.backup_path(1)).map_err(|e| {
                    LoggerError::file_rotation(
                        self.base_path.display().to_string(),
                        format!("Failed to rotate current log file: {}", e),
                    )
                })?;
            }
        }

        let (file, size) = Self::open_file(&self.base_path).map_err(|e| {
            LoggerError::file_rotation(
                self.base_path.display().to_string(),
                format!("Failed to create new log file: {}", e),
            )
        })?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;
        Ok(())
    }

    /// Get backup file path for given index
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let filename = self
            .base_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("aelog.log");
        self.base_path.with_file_name(format!("{}.{}", filename, index))
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut formatted = self.formatter.format(entry);
        formatted.push('\n');
        let bytes_written = formatted.len() as u64;

        let mut rotation_error = None;
        if self.should_rotate(bytes_written) {
            if let Err(e) = self.rotate() {
                // Keep writing to whatever file we can hold on to
                if self.writer.is_none() {
                    match Self::open_file(&self.base_path) {
                        Ok((file, _)) => self.writer = Some(BufWriter::new(file)),
                        Err(_) => return Err(e),
                    }
                }
                // Retry after another `max_bytes`, not on every record
                self.current_size = 0;
                rotation_error = Some(e);
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;
        writer.write_all(formatted.as_bytes()).map_err(|e| {
            LoggerError::file_appender(
                self.base_path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += bytes_written;

        // The record is kept, but the caller still learns the file is over its cap
        match rotation_error {
            Some(e) => {
                let _ = writer.flush();
                Err(e)
            }
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
