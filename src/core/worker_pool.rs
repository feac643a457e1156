//! Fixed-size worker pool for non-blocking log writes
//!
//! Jobs go through an unbounded channel, so submitting never blocks. Any
//! idle worker picks up the next job: two writes submitted back to back can
//! finish in either order. Callers that need ordered output use the
//! synchronous calls.

use super::error::{LoggerError, Result};
use super::logger::panic_message;
use crossbeam_channel::{unbounded, Sender};
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::OnceLock;
use std::task::{Context, Poll};
use std::thread;
use tokio::sync::oneshot;

type Job = Box<dyn FnOnce() + Send + 'static>;

static GLOBAL_POOL: OnceLock<WorkerPool> = OnceLock::new();

/// Fixed set of named threads that run non-blocking writes.
pub struct WorkerPool {
    sender: Sender<Job>,
    workers: usize,
}

impl WorkerPool {
    /// Spawn a pool with `size` workers (at least one is attempted)
    ///
    /// Workers run until the pool is dropped. If no worker thread can be
    /// spawned, jobs run inline on the submitting thread.
    pub fn new(size: usize) -> Self {
        let (sender, receiver) = unbounded::<Job>();
        let mut workers = 0;

        for idx in 0..size.max(1) {
            let receiver = receiver.clone();
            let spawned = thread::Builder::new()
                .name(format!("aelog-worker-{}", idx))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                });
            match spawned {
                Ok(_) => workers += 1,
                Err(e) => eprintln!("[LOGGER WARNING] Failed to spawn log worker {}: {}", idx, e),
            }
        }

        Self { sender, workers }
    }

    /// Pool sized to the host's available parallelism
    pub fn with_default_size() -> Self {
        Self::new(default_size())
    }

    /// Process-wide pool, created on first use and never torn down
    pub fn global() -> &'static WorkerPool {
        GLOBAL_POOL.get_or_init(WorkerPool::with_default_size)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Queue `job` and return a handle completing when it has run
    ///
    /// A panicking job resolves its handle with `TaskPanicked`; the worker
    /// survives.
    pub fn submit<F>(&self, job: F) -> LogHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let wrapped: Job = Box::new(move || {
            let outcome = catch_unwind(AssertUnwindSafe(job))
                .map_err(|panic| LoggerError::TaskPanicked(panic_message(panic.as_ref())));
            // The caller may have dropped the handle; that is fine
            let _ = tx.send(outcome);
        });

        if self.workers == 0 {
            wrapped();
        } else if let Err(send_error) = self.sender.send(wrapped) {
            // Every worker is gone; run it here rather than lose the record
            (send_error.into_inner())();
        }
        LogHandle { receiver: rx }
    }
}

fn default_size() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}

/// Completion handle for a submitted log write
///
/// Await it from async code or call [`LogHandle::wait`] from a plain thread.
/// Dropping the handle does not cancel the write.
#[must_use = "the write happens regardless; await or wait on the handle to observe completion"]
#[derive(Debug)]
pub struct LogHandle {
    receiver: oneshot::Receiver<Result<()>>,
}

impl LogHandle {
    /// Block until the write has finished
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context; await
    /// the handle there instead.
    pub fn wait(self) -> Result<()> {
        self.receiver
            .blocking_recv()
            .unwrap_or(Err(LoggerError::ChannelReceiveError))
    }

    /// Outcome if the write has already finished
    pub fn try_wait(&mut self) -> Option<Result<()>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(Err(LoggerError::ChannelReceiveError)),
        }
    }
}

impl Future for LogHandle {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(LoggerError::ChannelReceiveError)))
    }
}
