//! Parallel Adams–Bashforth stepper.
//!
//! The stepper carries a block of `s` stage values `Y_i ≈ x(t + (c_i − 1)h)`
//! spread over one step, with `Y_0` the most advanced. A step evaluates
//! `F_j = f(Y_j)` for every stage (all independent) and then moves the whole
//! block forward by `h`:
//!
//! ```text
//! Y'_i = Y_0 + h·Σ_j w_ij·F_j
//! ```
//!
//! The first call builds the stage block from its input with classic RK4.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::debug;

use super::coefficients::PabTableau;
use super::rk4::RungeKutta4;
use super::FirstOrderStepper;
use crate::algebra::Algebra;
use crate::error::StepperError;
use crate::ops::ScaleSum;
use crate::system::FirstOrderSystem;

/// `s`-stage parallel Adams–Bashforth method of order `s`, for `s` in 2..=8.
#[derive(Debug)]
pub struct ParallelAdamsBashforth<S, A> {
    algebra: A,
    tableau: Arc<PabTableau>,
    startup: RungeKutta4<S, A>,
    startup_substeps: usize,
    stages: Vec<S>,
    derivs: Vec<S>,
}

impl<S: Clone, A: Algebra<S> + Clone> ParallelAdamsBashforth<S, A> {
    /// RK4 substeps per node gap when building the stage block.
    pub const DEFAULT_STARTUP_SUBSTEPS: usize = 4;

    /// Stepper with `stages` stages.
    pub fn new(algebra: A, stages: usize) -> Result<Self, StepperError> {
        let tableau = PabTableau::for_stages(stages)?;
        Ok(Self {
            startup: RungeKutta4::new(algebra.clone()),
            algebra,
            tableau,
            startup_substeps: Self::DEFAULT_STARTUP_SUBSTEPS,
            stages: Vec::new(),
            derivs: Vec::new(),
        })
    }

    /// Set the number of RK4 substeps per node gap (at least 1).
    pub fn with_startup_substeps(mut self, substeps: usize) -> Self {
        self.startup_substeps = substeps.max(1);
        self
    }

    /// Number of stages.
    pub fn stage_count(&self) -> usize {
        self.tableau.stages()
    }

    /// Whether the stage block has been built.
    pub fn is_initialized(&self) -> bool {
        !self.stages.is_empty()
    }

    /// Build `Y_{s-1} = x`, then integrate backwards-in-index (forwards in
    /// time) across each node gap with RK4.
    fn initialize<Y>(&mut self, system: &Y, x: &S, dt: f64) -> Result<(), StepperError>
    where
        Y: FirstOrderSystem<S> + ?Sized,
    {
        let s = self.tableau.stages();
        let nodes = self.tableau.nodes();
        debug!(stages = s, substeps = self.startup_substeps, "building stage block");
        self.startup.reset();
        let mut block: Vec<S> = Vec::with_capacity(s);
        block.push(x.clone());
        for i in (0..s - 1).rev() {
            let mut y = block[block.len() - 1].clone();
            let sub = (nodes[i] - nodes[i + 1]) * dt / self.startup_substeps as f64;
            for _ in 0..self.startup_substeps {
                self.startup.do_step(system, &mut y, sub)?;
            }
            block.push(y);
        }
        block.reverse();
        self.derivs = (0..s).map(|_| self.algebra.zeros_like(x)).collect();
        self.stages = block;
        Ok(())
    }
}

impl<S: Clone, A: Algebra<S> + Clone> FirstOrderStepper<S> for ParallelAdamsBashforth<S, A> {
    /// On the first call (or after [`reset`](Self::reset)) `x` seeds the
    /// stage block. Every call leaves `x` advanced by `dt` from the previous
    /// output; the history is authoritative, so changes made to `x` between
    /// calls are ignored until `reset`.
    fn do_step<Y>(&mut self, system: &Y, x: &mut S, dt: f64) -> Result<(), StepperError>
    where
        Y: FirstOrderSystem<S> + ?Sized,
    {
        if !self.is_initialized() {
            self.initialize(system, x, dt)?;
            *x = self.stages[0].clone();
            return Ok(());
        }
        if !self.algebra.same_shape(&self.stages[0], x) {
            return Err(StepperError::ShapeMismatch {
                expected: self.algebra.shape(&self.stages[0]),
                actual: self.algebra.shape(x),
            });
        }

        for (y, f) in self.stages.iter().zip(self.derivs.iter_mut()) {
            system.rhs(y, f)?;
        }

        let s = self.tableau.stages();
        let (head, tail) = self.stages.split_at_mut(1);
        let y0 = &mut head[0];
        for (offset, dest) in tail.iter_mut().enumerate() {
            let i = offset + 1;
            let op = ScaleSum::new(
                std::iter::once(1.0).chain(self.tableau.weights(i).iter().map(|w| dt * w)),
            );
            let mut sources: SmallVec<[&S; ScaleSum::MAX_ARITY]> = SmallVec::with_capacity(s + 1);
            sources.push(&*y0);
            sources.extend(self.derivs.iter());
            self.algebra.combine(dest, &sources, &op)?;
        }
        let op = ScaleSum::new(
            std::iter::once(1.0).chain(self.tableau.weights(0).iter().map(|w| dt * w)),
        );
        let sources: SmallVec<[&S; ScaleSum::MAX_ARITY]> = self.derivs.iter().collect();
        self.algebra.accumulate(y0, &sources, &op)?;

        *x = y0.clone();
        Ok(())
    }

    fn order(&self) -> usize {
        self.tableau.stages()
    }

    fn reset(&mut self) {
        self.stages.clear();
        self.derivs.clear();
        self.startup.reset();
    }
}
