//! Fixed-size worker pool.
//!
//! Jobs are boxed closures sent over an unbounded crossbeam channel and
//! picked up by whichever worker is idle. All workers share that one FIFO
//! queue; there are no per-worker deques and no stealing, so jobs start in
//! submission order. Dropping the last [`Executor`]
//! handle closes the channel; workers drain the remaining jobs, exit, and
//! are joined.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::thread::{self, JoinHandle};

use chainflow_core::{ConfigError, TaskFault};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use crate::dataflow::{self, Dependency, Launch};
use crate::slot::Slot;

pub(crate) type Job = Box<dyn FnOnce() + Send>;

/// Worker-pool configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Number of worker threads. `None` = `available_parallelism`.
    pub worker_count: Option<usize>,
}

impl ExecutorConfig {
    /// Upper bound applied to explicit worker counts.
    pub const MAX_WORKERS: usize = 256;

    /// Configuration with an explicit worker count.
    pub fn with_workers(n: usize) -> Self {
        Self {
            worker_count: Some(n),
        }
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 256]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, Self::MAX_WORKERS),
            None => thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, Self::MAX_WORKERS),
        }
    }
}

pub(crate) struct PoolShared {
    sender: Option<Sender<Job>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    worker_count: usize,
}

impl PoolShared {
    pub(crate) fn send(&self, job: Job) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(job).is_err() {
            // Unreachable while workers hold the receiver; the job (and any
            // promise it owns) is dropped, which poisons its slot.
            warn!("executor channel closed, job dropped");
        }
    }
}

impl Drop for PoolShared {
    fn drop(&mut self) {
        drop(self.sender.take());
        let me = thread::current().id();
        let handles =
            std::mem::take(&mut *self.workers.lock().unwrap_or_else(PoisonError::into_inner));
        let mut joined = 0;
        for handle in handles {
            // The last handle may be released by a job on a worker thread.
            if handle.thread().id() == me {
                continue;
            }
            if handle.join().is_ok() {
                joined += 1;
            }
        }
        debug!(joined, workers = self.worker_count, "executor shut down");
    }
}

/// Shared handle to a worker pool.
///
/// Cloning is cheap; the pool shuts down when the last clone is dropped.
#[derive(Clone)]
pub struct Executor {
    shared: Arc<PoolShared>,
}

impl Executor {
    /// Spawn a pool sized by `config`.
    pub fn new(config: &ExecutorConfig) -> Result<Self, ConfigError> {
        let worker_count = config.resolved_worker_count();
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();
        let mut workers = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let rx = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("chainflow-worker-{i}"))
                .spawn(move || worker_loop(rx))
                .map_err(|e| ConfigError::ThreadSpawnFailed {
                    reason: e.to_string(),
                })?;
            workers.push(handle);
        }
        debug!(worker_count, "executor started");
        Ok(Self {
            shared: Arc::new(PoolShared {
                sender: Some(sender),
                workers: Mutex::new(workers),
                worker_count,
            }),
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.shared.worker_count
    }

    /// Queue a fire-and-forget job.
    ///
    /// A panic inside `job` is caught and logged; the worker survives.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.send(Box::new(job));
    }

    /// Run `body` on the pool and return a slot for its result.
    pub fn async_task<T, F>(&self, body: F) -> Slot<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T, TaskFault> + Send + 'static,
    {
        self.dataflow(Launch::Pool, &[], body)
    }

    /// Run `body` once every dependency has resolved.
    ///
    /// Returns immediately. If any dependency is poisoned the node is
    /// poisoned with that fault and `body` never runs. Otherwise `body`
    /// runs according to `launch`: on the thread that resolved the last
    /// dependency (`Inline`) or on a pool worker (`Pool`). A panic in `body`
    /// poisons the result with [`TaskFault::Panicked`].
    pub fn dataflow<T, F>(&self, launch: Launch, deps: &[&dyn Dependency], body: F) -> Slot<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T, TaskFault> + Send + 'static,
    {
        dataflow::spawn(self.downgrade(), launch, deps, body)
    }

    pub(crate) fn downgrade(&self) -> Weak<PoolShared> {
        Arc::downgrade(&self.shared)
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("worker_count", &self.shared.worker_count)
            .finish()
    }
}

fn worker_loop(rx: Receiver<Job>) {
    while let Ok(job) = rx.recv() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            warn!(
                message = %panic_message(&*payload),
                "pool job panicked"
            );
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
