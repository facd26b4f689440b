//! Symplectic Runge–Kutta–Nyström stepper.

use super::HamiltonianStepper;
use crate::algebra::Algebra;
use crate::error::StepperError;
use crate::ops::ScaleSum;
use crate::system::ForceField;

const A0: f64 = 0.405_188_618_395_252_277_22;
const A1: f64 = -0.287_144_040_816_524_089_00;
const A2: f64 = 0.5 - (A0 + A1);
const B0: f64 = -3.0 / 73.0;
const B1: f64 = 17.0 / 59.0;
const B2: f64 = 1.0 - 2.0 * (B0 + B1);

/// Kick coefficients: the `b` weights shifted one stage later, `b5 = 0`
/// dropped.
const KICK: [f64; 6] = [0.0, B0, B1, B2, B1, B0];
/// Drift coefficients: the `a` weights.
const DRIFT: [f64; 6] = [A0, A1, A2, A2, A1, A0];

/// McLachlan's SB3A: 6 stages, order 4, symplectic, 5 force evaluations
/// per step.
///
/// The method drifts `q += a_i·dt·p` and then kicks `p += b_i·dt·F(q)`
/// for `i = 0..6`. Here each stage kicks with the previous stage's `b`
/// and then drifts, so the first stage is a pure drift and the trailing
/// `b5 = 0` kick disappears. Stages with a zero coefficient skip that
/// update. Every update goes through the [`Algebra`], so `q` and `p` may
/// be asynchronous.
#[derive(Debug)]
pub struct SymplecticRkn<S, A> {
    algebra: A,
    dpdt: Option<S>,
}

impl<S, A: Algebra<S>> SymplecticRkn<S, A> {
    /// Number of stages per step.
    pub const STAGES: usize = 6;

    /// Stepper combining states with `algebra`.
    pub fn new(algebra: A) -> Self {
        Self {
            algebra,
            dpdt: None,
        }
    }

    /// The algebra in use.
    pub fn algebra(&self) -> &A {
        &self.algebra
    }
}

impl<S, A: Algebra<S>> HamiltonianStepper<S> for SymplecticRkn<S, A> {
    fn do_step<F>(&mut self, force: &F, q: &mut S, p: &mut S, dt: f64) -> Result<(), StepperError>
    where
        F: ForceField<S> + ?Sized,
    {
        let algebra = &self.algebra;
        if !algebra.same_shape(q, p) {
            return Err(StepperError::ShapeMismatch {
                expected: algebra.shape(q),
                actual: algebra.shape(p),
            });
        }
        let dpdt = self.dpdt.get_or_insert_with(|| algebra.zeros_like(q));
        if !algebra.same_shape(dpdt, q) {
            return Err(StepperError::ShapeMismatch {
                expected: algebra.shape(dpdt),
                actual: algebra.shape(q),
            });
        }
        for (&a, &b) in KICK.iter().zip(&DRIFT) {
            if a != 0.0 {
                force.force(q, dpdt)?;
                algebra.accumulate(p, &[&*dpdt], &ScaleSum::scale_sum2(1.0, a * dt))?;
            }
            if b != 0.0 {
                algebra.accumulate(q, &[&*p], &ScaleSum::scale_sum2(1.0, b * dt))?;
            }
        }
        Ok(())
    }

    fn order(&self) -> usize {
        4
    }

    fn reset(&mut self) {
        self.dpdt = None;
    }
}
