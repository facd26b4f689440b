//! Block task graph for one force evaluation.
//!
//! For block `i` the builder chains:
//!
//! - an inline projection node over block `i-1`'s position slot that yields
//!   its last value (when `i > 0`),
//! - an inline projection node over block `i+1`'s position slot that
//!   yields its first value (when `i < M-1`),
//! - a pool node running the block kernel once its own positions and both
//!   projections have resolved,
//!
//! and rebinds index `i` of the output state to the kernel node's slot.
//! Adjacent blocks therefore proceed as soon as their own neighbours are
//! ready, with no step-wide barrier unless [`SyncPolicy::Barrier`] is set.

use std::sync::Arc;

use chainflow_core::{Block, BlockId, ChainParams, KernelError, Partition, TaskFault};
use chainflow_integrate::{FirstOrderSystem, ForceField, StepperError};
use chainflow_kernel::{check_finite, BlockKernel, BlockStencil};
use chainflow_task::{BlockState, Dependency, Executor, Launch, Slot};
use smallvec::SmallVec;
use tracing::trace;

use crate::config::SyncPolicy;

/// Which end of a neighbour block a projection reads.
#[derive(Clone, Copy, Debug)]
enum Edge {
    First,
    Last,
}

/// Evaluates a [`BlockStencil`] over partitioned state as a graph of
/// per-block dataflow nodes.
#[derive(Debug)]
pub struct StencilGraph<K> {
    executor: Executor,
    partition: Partition,
    kernel: Arc<K>,
    policy: SyncPolicy,
    check_finite: bool,
}

/// The oscillator-chain force as a task graph.
pub type ChainForce = StencilGraph<BlockKernel>;

impl ChainForce {
    /// Task-graph force for a chain with `params`.
    pub fn chain(executor: Executor, partition: Partition, params: &ChainParams) -> Self {
        Self::new(executor, partition, BlockKernel::new(params))
    }
}

impl<K: BlockStencil> StencilGraph<K> {
    /// Graph evaluating `kernel`, lazy and with the finite check on.
    pub fn new(executor: Executor, partition: Partition, kernel: K) -> Self {
        Self {
            executor,
            partition,
            kernel: Arc::new(kernel),
            policy: SyncPolicy::Lazy,
            check_finite: true,
        }
    }

    /// Set the synchronization policy.
    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable the non-finite check after each kernel.
    pub fn with_finite_check(mut self, enabled: bool) -> Self {
        self.check_finite = enabled;
        self
    }

    /// Block geometry.
    pub fn partition(&self) -> Partition {
        self.partition
    }

    /// Synchronization policy in effect.
    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Schedule `out = K(x)` block by block.
    ///
    /// Under [`SyncPolicy::Lazy`] this returns once every node is
    /// scheduled; faults surface in `out`'s slots. Under
    /// [`SyncPolicy::Barrier`] it waits for all of `out` and returns the
    /// first fault.
    pub fn evaluate(&self, x: &BlockState, out: &mut BlockState) -> Result<(), StepperError> {
        let blocks = self.partition.block_count();
        for state in [x.len(), out.len()] {
            if state != blocks {
                return Err(StepperError::ShapeMismatch {
                    expected: blocks,
                    actual: state,
                });
            }
        }
        for b in self.partition.blocks() {
            let slot = self.block_node(x, b);
            out.rebind(b.index(), slot);
        }
        trace!(blocks, "stencil graph scheduled");
        if self.policy == SyncPolicy::Barrier {
            out.wait_all()?;
        }
        Ok(())
    }

    fn block_node(&self, x: &BlockState, b: BlockId) -> Slot<Block> {
        let i = b.index();
        let own = x.get(i).clone();
        let left = (i > 0).then(|| self.project(x.get(i - 1), Edge::Last));
        let right = (i + 1 < x.len()).then(|| self.project(x.get(i + 1), Edge::First));

        let mut deps: SmallVec<[&dyn Dependency; 3]> = SmallVec::new();
        deps.push(&own);
        if let Some(l) = &left {
            deps.push(l);
        }
        if let Some(r) = &right {
            deps.push(r);
        }

        let kernel = Arc::clone(&self.kernel);
        let block_len = self.partition.block_len();
        let check = self.check_finite;
        let (q, l, r) = (own.clone(), left.clone(), right.clone());
        self.executor.dataflow(Launch::Pool, &deps, move || {
            let q = q.wait()?;
            if q.len() != block_len {
                return Err(KernelError::LengthMismatch {
                    expected: block_len,
                    actual: q.len(),
                }
                .into());
            }
            let left = l.map(|s| s.wait().map(|v| *v)).transpose()?;
            let right = r.map(|s| s.wait().map(|v| *v)).transpose()?;
            let mut dpdt = vec![0.0; block_len];
            kernel.apply(&q, left, right, &mut dpdt)?;
            if check {
                check_finite(Some(b), &dpdt)?;
            }
            Ok(dpdt)
        })
    }

    /// Inline node yielding one end value of `block`.
    fn project(&self, block: &Slot<Block>, edge: Edge) -> Slot<f64> {
        let src = block.clone();
        self.executor.dataflow(Launch::Inline, &[block], move || {
            let values = src.wait()?;
            let v = match edge {
                Edge::First => values.first(),
                Edge::Last => values.last(),
            };
            v.copied().ok_or(TaskFault::Kernel(KernelError::LengthMismatch {
                expected: 1,
                actual: 0,
            }))
        })
    }
}

impl<K: BlockStencil> ForceField<BlockState> for StencilGraph<K> {
    fn force(&self, q: &BlockState, dpdt: &mut BlockState) -> Result<(), StepperError> {
        self.evaluate(q, dpdt)
    }
}

impl<K: BlockStencil> FirstOrderSystem<BlockState> for StencilGraph<K> {
    fn rhs(&self, x: &BlockState, dxdt: &mut BlockState) -> Result<(), StepperError> {
        self.evaluate(x, dxdt)
    }
}
