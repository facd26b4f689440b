//! Write-once asynchronous slots.
//!
//! A [`Slot`] is a shared handle to a value that is produced exactly once.
//! The producing side holds the matching [`Promise`]; fulfilling or
//! poisoning it resolves the slot, wakes blocked readers and runs every
//! registered continuation. Dropping an unresolved promise poisons the
//! slot with [`TaskFault::Abandoned`], so readers never hang on a producer
//! that went away.
//!
//! Continuations run iteratively. A continuation that resolves another
//! slot, as every dataflow node does, queues that slot's continuations on
//! the current thread instead of calling them from inside its own frame,
//! so a fault crossing thousands of chained nodes uses constant stack.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use chainflow_core::TaskFault;
use smallvec::SmallVec;

/// What a slot resolves to.
pub type Outcome<T> = Result<Arc<T>, TaskFault>;

type Continuation<T> = Box<dyn FnOnce(Outcome<T>) + Send>;

enum State<T> {
    Pending(SmallVec<[Continuation<T>; 2]>),
    Resolved(Outcome<T>),
}

struct Inner<T> {
    state: Mutex<State<T>>,
    resolved: Condvar,
}

impl<T> Inner<T> {
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        // Continuations never run under the lock, so a poisoned mutex
        // still guards a consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shared read handle to a write-once value.
pub struct Slot<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Send + Sync + 'static> Slot<T> {
    fn with_state(state: State<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                resolved: Condvar::new(),
            }),
        }
    }

    /// A slot that is already resolved to `value`.
    pub fn ready(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// A slot that is already resolved to a shared value.
    pub fn from_arc(value: Arc<T>) -> Self {
        Self::with_state(State::Resolved(Ok(value)))
    }

    /// A slot that is already poisoned.
    pub fn poisoned(fault: TaskFault) -> Self {
        Self::with_state(State::Resolved(Err(fault)))
    }

    /// An unresolved slot together with the promise that resolves it.
    pub fn pending() -> (Self, Promise<T>) {
        let slot = Self::with_state(State::Pending(SmallVec::new()));
        let promise = Promise {
            inner: Some(Arc::clone(&slot.inner)),
        };
        (slot, promise)
    }

    /// Block the calling thread until the slot resolves.
    ///
    /// Must not be called from a pool worker on a slot that only another
    /// pool task can resolve: with every worker blocked the pool stalls.
    pub fn wait(&self) -> Outcome<T> {
        let mut state = self.inner.lock();
        loop {
            if let State::Resolved(outcome) = &*state {
                return outcome.clone();
            }
            state = self
                .inner
                .resolved
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// The outcome if the slot has resolved, without blocking.
    pub fn try_get(&self) -> Option<Outcome<T>> {
        match &*self.inner.lock() {
            State::Resolved(outcome) => Some(outcome.clone()),
            State::Pending(_) => None,
        }
    }

    /// Whether the slot has resolved (ready or poisoned).
    pub fn is_resolved(&self) -> bool {
        matches!(&*self.inner.lock(), State::Resolved(_))
    }

    /// Run `f` with the outcome once the slot resolves.
    ///
    /// If the slot is already resolved, `f` runs immediately on the calling
    /// thread. Otherwise it runs on the thread that resolves the slot, once
    /// that thread is done delivering any earlier outcome.
    pub fn when_resolved<F>(&self, f: F)
    where
        F: FnOnce(Outcome<T>) + Send + 'static,
    {
        let outcome = {
            let mut state = self.inner.lock();
            match &mut *state {
                State::Pending(waiters) => {
                    waiters.push(Box::new(f));
                    return;
                }
                State::Resolved(outcome) => outcome.clone(),
            }
        };
        f(outcome);
    }

    /// Whether two handles refer to the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.inner.lock() {
            State::Pending(_) => "pending",
            State::Resolved(Ok(_)) => "ready",
            State::Resolved(Err(_)) => "poisoned",
        };
        f.debug_struct("Slot").field("state", &state).finish()
    }
}

// ── Promise ────────────────────────────────────────────────────────

/// The single producer of a [`Slot`].
pub struct Promise<T: Send + Sync + 'static> {
    inner: Option<Arc<Inner<T>>>,
}

impl<T: Send + Sync + 'static> Promise<T> {
    /// Resolve the slot to `value`.
    pub fn fulfil(self, value: T) {
        self.resolve(Ok(Arc::new(value)));
    }

    /// Resolve the slot to an already shared value.
    pub fn fulfil_arc(self, value: Arc<T>) {
        self.resolve(Ok(value));
    }

    /// Poison the slot with `fault`.
    pub fn poison(self, fault: TaskFault) {
        self.resolve(Err(fault));
    }

    /// Resolve the slot to `outcome`.
    pub fn resolve(mut self, outcome: Outcome<T>) {
        if let Some(inner) = self.inner.take() {
            settle(&inner, outcome);
        }
    }
}

impl<T: Send + Sync + 'static> Drop for Promise<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            settle(&inner, Err(TaskFault::Abandoned));
        }
    }
}

impl<T: Send + Sync + 'static> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("armed", &self.inner.is_some())
            .finish()
    }
}

fn settle<T: Send + Sync + 'static>(inner: &Inner<T>, outcome: Outcome<T>) {
    let waiters = {
        let mut state = inner.lock();
        match std::mem::replace(&mut *state, State::Resolved(outcome.clone())) {
            State::Pending(waiters) => waiters,
            State::Resolved(previous) => {
                // Only one promise exists per slot; keep the first outcome.
                *state = State::Resolved(previous);
                return;
            }
        }
    };
    inner.resolved.notify_all();
    deliver(waiters.into_iter().map(|waiter| {
        let outcome = outcome.clone();
        Box::new(move || waiter(outcome)) as Deferred
    }));
}

// ── Delivery ───────────────────────────────────────────────────────

type Deferred = Box<dyn FnOnce()>;

thread_local! {
    static QUEUE: RefCell<VecDeque<Deferred>> = const { RefCell::new(VecDeque::new()) };
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// Queue `jobs` on this thread and, unless an outer frame is already
/// draining the queue, run them and everything they enqueue in FIFO order.
fn deliver(jobs: impl Iterator<Item = Deferred>) {
    QUEUE.with(|q| q.borrow_mut().extend(jobs));
    if DELIVERING.with(|d| d.replace(true)) {
        return;
    }
    let _guard = DeliveryGuard;
    while let Some(job) = QUEUE.with(|q| q.borrow_mut().pop_front()) {
        job();
    }
}

/// Clears the draining flag even if a continuation unwinds.
struct DeliveryGuard;

impl Drop for DeliveryGuard {
    fn drop(&mut self) {
        DELIVERING.with(|d| d.set(false));
    }
}
