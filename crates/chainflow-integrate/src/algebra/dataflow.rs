//! Asynchronous algebra over partitioned state.
//!
//! Every call chains one dataflow node per block onto the operand slots and
//! rebinds the destination index to the node's output slot. Nothing
//! blocks; blocks proceed independently as soon as their own operands
//! resolve.

use std::sync::Arc;

use chainflow_core::{Block, TaskFault};
use chainflow_task::{BlockState, Dependency, Executor, Launch, Slot};
use smallvec::SmallVec;

use super::{check_shapes, Algebra};
use crate::error::AlgebraError;
use crate::ops::ScaleSum;

type Operands = SmallVec<[Slot<Block>; ScaleSum::MAX_ARITY]>;

/// Combines [`BlockState`]s by spawning one node per block on an executor.
#[derive(Clone, Debug)]
pub struct DataflowAlgebra {
    executor: Executor,
    launch: Launch,
}

impl DataflowAlgebra {
    /// Algebra whose nodes run on `executor`'s pool.
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            launch: Launch::Pool,
        }
    }

    /// Choose where combination nodes run.
    pub fn with_launch(mut self, launch: Launch) -> Self {
        self.launch = launch;
        self
    }

    /// The executor nodes are spawned on.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Spawn the node computing `op(operands…)` for one block.
    fn spawn(&self, operands: Operands, op: ScaleSum) -> Slot<Block> {
        let deps: SmallVec<[&dyn Dependency; ScaleSum::MAX_ARITY]> =
            operands.iter().map(|s| s as &dyn Dependency).collect();
        let inputs = operands.clone();
        self.executor.dataflow(self.launch, &deps, move || {
            let values = inputs
                .iter()
                .map(Slot::wait)
                .collect::<Result<SmallVec<[Arc<Block>; ScaleSum::MAX_ARITY]>, TaskFault>>()?;
            let views: SmallVec<[&[f64]; ScaleSum::MAX_ARITY]> =
                values.iter().map(|v| v.as_slice()).collect();
            let mut out = vec![0.0; views.first().map_or(0, |v| v.len())];
            op.apply(&views, &mut out)?;
            Ok(out)
        })
    }
}

impl Algebra<BlockState> for DataflowAlgebra {
    fn combine(
        &self,
        dest: &mut BlockState,
        sources: &[&BlockState],
        op: &ScaleSum,
    ) -> Result<(), AlgebraError> {
        op.check_arity(sources.len())?;
        check_shapes(self, dest, sources)?;
        for i in 0..dest.len() {
            let operands: Operands = sources.iter().map(|s| s.get(i).clone()).collect();
            let slot = self.spawn(operands, op.clone());
            dest.rebind(i, slot);
        }
        Ok(())
    }

    fn accumulate(
        &self,
        dest: &mut BlockState,
        sources: &[&BlockState],
        op: &ScaleSum,
    ) -> Result<(), AlgebraError> {
        op.check_arity(sources.len() + 1)?;
        check_shapes(self, dest, sources)?;
        for i in 0..dest.len() {
            let operands: Operands = std::iter::once(dest.get(i).clone())
                .chain(sources.iter().map(|s| s.get(i).clone()))
                .collect();
            let slot = self.spawn(operands, op.clone());
            dest.rebind(i, slot);
        }
        Ok(())
    }

    fn zeros_like(&self, template: &BlockState) -> BlockState {
        let slots = template
            .iter()
            .map(|t| {
                let src = t.clone();
                self.executor
                    .dataflow(Launch::Inline, &[t], move || Ok(vec![0.0; src.wait()?.len()]))
            })
            .collect();
        BlockState::new(slots)
    }

    fn same_shape(&self, a: &BlockState, b: &BlockState) -> bool {
        a.len() == b.len()
    }

    fn shape(&self, state: &BlockState) -> usize {
        state.len()
    }
}
