//! Right-hand sides driven by the steppers.

use crate::error::StepperError;

/// Momentum derivative of a separable Hamiltonian system, `dp/dt = F(q)`.
pub trait ForceField<S> {
    /// Write `F(q)` into `dpdt`.
    ///
    /// `dpdt` must already have the shape of `q`. Implementations over
    /// asynchronous state may return before the result is computed.
    fn force(&self, q: &S, dpdt: &mut S) -> Result<(), StepperError>;
}

/// Autonomous first-order system `dx/dt = f(x)`.
pub trait FirstOrderSystem<S> {
    /// Write `f(x)` into `dxdt`.
    fn rhs(&self, x: &S, dxdt: &mut S) -> Result<(), StepperError>;
}

impl<S, T: ForceField<S> + ?Sized> ForceField<S> for &T {
    fn force(&self, q: &S, dpdt: &mut S) -> Result<(), StepperError> {
        (**self).force(q, dpdt)
    }
}

impl<S, T: FirstOrderSystem<S> + ?Sized> FirstOrderSystem<S> for &T {
    fn rhs(&self, x: &S, dxdt: &mut S) -> Result<(), StepperError> {
        (**self).rhs(x, dxdt)
    }
}

/// A point in phase space: positions and momenta of the same shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Phase<S> {
    /// Positions.
    pub q: S,
    /// Momenta.
    pub p: S,
}

impl<S> Phase<S> {
    /// Pair positions with momenta.
    pub fn new(q: S, p: S) -> Self {
        Self { q, p }
    }
}

/// A Hamiltonian force field seen as the first-order system
/// `d(q, p)/dt = (p, F(q))`, so first-order steppers can integrate it.
#[derive(Clone, Copy, Debug)]
pub struct PhaseSpace<F> {
    force: F,
}

impl<F> PhaseSpace<F> {
    /// Wrap a force field.
    pub fn new(force: F) -> Self {
        Self { force }
    }
}

impl<S: Clone, F: ForceField<S>> FirstOrderSystem<Phase<S>> for PhaseSpace<F> {
    fn rhs(&self, x: &Phase<S>, dxdt: &mut Phase<S>) -> Result<(), StepperError> {
        dxdt.q = x.p.clone();
        self.force.force(&x.q, &mut dxdt.p)
    }
}
