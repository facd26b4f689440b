//! Dependency-counted dataflow nodes.
//!
//! A node starts with a counter of `deps + 1`. Every dependency decrements
//! it on resolution; the extra count is released once all continuations are
//! registered, so a node whose dependencies are already resolved cannot
//! fire half-wired. The thread that brings the counter to zero launches the
//! body, or poisons the node if any dependency was poisoned.
//!
//! A node reaches its dependents only through its slot, and slots deliver
//! continuations from a per-thread queue, so neither a fault nor an
//! abandoned node deepens the stack as it crosses a long graph.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use chainflow_core::TaskFault;

use crate::executor::{panic_message, PoolShared};
use crate::slot::{Promise, Slot};

/// Where a node body runs once its dependencies are ready.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Launch {
    /// On the thread that resolved the last dependency. For short
    /// projections that are not worth a queue round-trip.
    Inline,
    /// On a pool worker.
    #[default]
    Pool,
}

/// Anything a dataflow node can wait on.
pub trait Dependency {
    /// Call `f` once resolved, with the fault if the dependency is poisoned.
    fn on_resolved(&self, f: Box<dyn FnOnce(Option<TaskFault>) + Send>);
}

impl<T: Send + Sync + 'static> Dependency for Slot<T> {
    fn on_resolved(&self, f: Box<dyn FnOnce(Option<TaskFault>) + Send>) {
        self.when_resolved(move |outcome| f(outcome.err()));
    }
}

type Fire = Box<dyn FnOnce(Option<TaskFault>) + Send>;

struct Node {
    remaining: AtomicUsize,
    fault: Mutex<Option<TaskFault>>,
    fire: Mutex<Option<Fire>>,
}

impl Node {
    fn arrive(&self, fault: Option<TaskFault>) {
        if let Some(fault) = fault {
            let mut first = self.fault.lock().unwrap_or_else(PoisonError::into_inner);
            if first.is_none() {
                *first = Some(fault);
            }
        }
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            let fire = self
                .fire
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            let fault = self
                .fault
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(fire) = fire {
                fire(fault);
            }
        }
    }
}

pub(crate) fn spawn<T, F>(
    pool: Weak<PoolShared>,
    launch: Launch,
    deps: &[&dyn Dependency],
    body: F,
) -> Slot<T>
where
    T: Send + Sync + 'static,
    F: FnOnce() -> Result<T, TaskFault> + Send + 'static,
{
    let (slot, promise) = Slot::pending();
    let fire: Fire = Box::new(move |fault| {
        if let Some(fault) = fault {
            promise.poison(fault);
            return;
        }
        match launch {
            Launch::Inline => run(promise, body),
            Launch::Pool => match pool.upgrade() {
                Some(pool) => pool.send(Box::new(move || run(promise, body))),
                // Executor gone: dropping the promise poisons the slot.
                None => drop(promise),
            },
        }
    });
    let node = Arc::new(Node {
        remaining: AtomicUsize::new(deps.len() + 1),
        fault: Mutex::new(None),
        fire: Mutex::new(Some(fire)),
    });
    for dep in deps {
        let node = Arc::clone(&node);
        dep.on_resolved(Box::new(move |fault| node.arrive(fault)));
    }
    node.arrive(None);
    slot
}

fn run<T, F>(promise: Promise<T>, body: F)
where
    T: Send + Sync + 'static,
    F: FnOnce() -> Result<T, TaskFault>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => promise.fulfil(value),
        Ok(Err(fault)) => promise.poison(fault),
        Err(payload) => promise.poison(TaskFault::Panicked {
            message: panic_message(&*payload),
        }),
    }
}
