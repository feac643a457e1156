//! Process-wide logging state
//!
//! The registry owns the active backend and the "initialized" flag. The
//! backend is an `Arc<Logger>` swapped under a write lock only after the new
//! one has been fully built, so a writer holds either the old wiring or the
//! new one in full. Writers clone the `Arc` and release the lock before any
//! I/O happens.

use super::config::{LogOptions, LoggingConfig};
use super::error::Result;
use super::log_entry::LogEntry;
use super::logger::Logger;
use super::worker_pool::{LogHandle, WorkerPool};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Arc<Registry>> = OnceLock::new();

/// Holds the active wiring and swaps it whole on each configuration.
pub struct Registry {
    active: RwLock<Arc<Logger>>,
    initialized: AtomicBool,
    /// Serializes configuration so first-use defaults apply once
    configure_lock: Mutex<()>,
    /// Number of wirings applied so far
    generation: AtomicU64,
}

impl Registry {
    /// A fresh, uninitialized registry
    ///
    /// Until configured it holds a backend with no sinks; the first record
    /// triggers the default configuration.
    pub fn new() -> Self {
        Self {
            active: RwLock::new(Arc::new(Logger::empty())),
            initialized: AtomicBool::new(false),
            configure_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// The registry behind the crate's free functions and macros
    pub fn global() -> &'static Arc<Registry> {
        GLOBAL_REGISTRY.get_or_init(|| Arc::new(Registry::new()))
    }

    /// Replace the active wiring according to `options`
    ///
    /// Last call wins; every call fully re-wires the backend.
    ///
    /// # Errors
    ///
    /// Returns a configuration error (bad policy, unopenable file) before the
    /// active wiring is touched.
    pub fn configure(&self, options: &LogOptions) -> Result<()> {
        self.apply(&LoggingConfig::from_options(options)?)
    }

    /// Build and install a declarative configuration
    ///
    /// # Errors
    ///
    /// See [`LoggingConfig::build`].
    pub fn apply(&self, config: &LoggingConfig) -> Result<()> {
        let _guard = self.configure_lock.lock();
        let logger = config.build()?;
        self.swap(logger);
        Ok(())
    }

    /// Install an already built backend
    pub fn install(&self, logger: Logger) {
        let _guard = self.configure_lock.lock();
        self.swap(logger);
    }

    fn swap(&self, logger: Logger) {
        let previous = std::mem::replace(&mut *self.active.write(), Arc::new(logger));
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.initialized.store(true, Ordering::Release);
        // Flushed and closed once the last in-flight writer lets go
        drop(previous);
    }

    /// Apply the console defaults unless something is configured already
    pub fn ensure_configured(&self) {
        if self.initialized.load(Ordering::Acquire) {
            return;
        }
        let _guard = self.configure_lock.lock();
        if self.initialized.load(Ordering::Acquire) {
            return;
        }
        match LoggingConfig::from_options(&LogOptions::default()).and_then(|c| c.build()) {
            Ok(logger) => self.swap(logger),
            Err(e) => eprintln!("[LOGGER ERROR] Default configuration failed: {}", e),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Snapshot of the active backend
    pub fn active(&self) -> Arc<Logger> {
        Arc::clone(&self.active.read())
    }

    /// Write a record on the calling thread
    pub fn log(&self, entry: &LogEntry) -> usize {
        self.ensure_configured();
        self.active().log_entry(entry)
    }

    /// Hand a record to `pool`; the wiring active when a worker picks it up
    /// is the one that writes it
    pub fn log_async(self: &Arc<Self>, pool: &WorkerPool, entry: LogEntry) -> LogHandle {
        self.ensure_configured();
        let registry = Arc::clone(self);
        pool.submit(move || {
            registry.active().log_entry(&entry);
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
