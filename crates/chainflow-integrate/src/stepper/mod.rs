//! Time steppers.
//!
//! - [`SymplecticRkn`]: 6-stage, order-4 Runge–Kutta–Nyström for separable
//!   Hamiltonians (`q'' = F(q)`).
//! - [`ParallelAdamsBashforth`]: `s`-stage parallel Adams–Bashforth for
//!   first-order systems; the `s` right-hand-side evaluations of a step are
//!   independent of each other.
//! - [`RungeKutta4`]: classic 4-stage Runge–Kutta, also used to start the
//!   Adams–Bashforth stage block.
//!
//! None of them adapt the step size.

mod coefficients;
mod pab;
mod rk4;
mod rkn;

pub use coefficients::PabTableau;
pub use pab::ParallelAdamsBashforth;
pub use rk4::RungeKutta4;
pub use rkn::SymplecticRkn;

use crate::error::StepperError;
use crate::system::{FirstOrderSystem, ForceField};

/// Advances positions and momenta of a separable Hamiltonian system.
pub trait HamiltonianStepper<S> {
    /// Advance `(q, p)` by `dt`.
    fn do_step<F>(&mut self, force: &F, q: &mut S, p: &mut S, dt: f64) -> Result<(), StepperError>
    where
        F: ForceField<S> + ?Sized;

    /// Order of accuracy.
    fn order(&self) -> usize;

    /// Drop any buffers tied to the previous state's shape.
    fn reset(&mut self);
}

/// Advances the state of a first-order system.
pub trait FirstOrderStepper<S> {
    /// Advance `x` by `dt`.
    fn do_step<Y>(&mut self, system: &Y, x: &mut S, dt: f64) -> Result<(), StepperError>
    where
        Y: FirstOrderSystem<S> + ?Sized;

    /// Order of accuracy.
    fn order(&self) -> usize;

    /// Discard history; the next step starts afresh from its input.
    fn reset(&mut self);
}

/// Take `steps` steps of size `dt`.
pub fn integrate_n_steps<S, St, Y>(
    stepper: &mut St,
    system: &Y,
    x: &mut S,
    dt: f64,
    steps: usize,
) -> Result<(), StepperError>
where
    St: FirstOrderStepper<S> + ?Sized,
    Y: FirstOrderSystem<S> + ?Sized,
{
    for _ in 0..steps {
        stepper.do_step(system, x, dt)?;
    }
    Ok(())
}

/// Take `steps` Hamiltonian steps of size `dt`.
pub fn integrate_hamiltonian_n_steps<S, St, F>(
    stepper: &mut St,
    force: &F,
    q: &mut S,
    p: &mut S,
    dt: f64,
    steps: usize,
) -> Result<(), StepperError>
where
    St: HamiltonianStepper<S> + ?Sized,
    F: ForceField<S> + ?Sized,
{
    for _ in 0..steps {
        stepper.do_step(force, q, p, dt)?;
    }
    Ok(())
}
