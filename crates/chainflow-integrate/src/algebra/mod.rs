//! Elementwise state combination.
//!
//! An [`Algebra`] knows how to apply a [`ScaleSum`] index-wise across
//! whole states. Steppers express every stage update through it, never
//! touching state elements directly.

mod dataflow;
mod flat;
mod phase;

pub use dataflow::DataflowAlgebra;
pub use flat::FlatAlgebra;

use crate::error::AlgebraError;
use crate::ops::ScaleSum;

/// Elementwise combination of states of type `S`.
///
/// Implementations must treat indices independently and may return before
/// the result is computed.
pub trait Algebra<S> {
    /// Set `dest[j] = op(sources[0][j], …, sources[k-1][j])` for every `j`.
    ///
    /// `op` must take exactly `sources.len()` operands.
    fn combine(&self, dest: &mut S, sources: &[&S], op: &ScaleSum) -> Result<(), AlgebraError>;

    /// Set `dest[j] = op(dest[j], sources[0][j], …)` for every `j`.
    ///
    /// `op` must take `sources.len() + 1` operands.
    fn accumulate(&self, dest: &mut S, sources: &[&S], op: &ScaleSum)
        -> Result<(), AlgebraError>;

    /// A zero-filled state with the shape of `template`.
    fn zeros_like(&self, template: &S) -> S;

    /// Whether two states have the same shape.
    fn same_shape(&self, a: &S, b: &S) -> bool;

    /// Shape token used in error reports.
    fn shape(&self, state: &S) -> usize;
}

/// Fail with [`AlgebraError::ShapeMismatch`] unless every source matches
/// `dest`.
pub(crate) fn check_shapes<S, A: Algebra<S> + ?Sized>(
    algebra: &A,
    dest: &S,
    sources: &[&S],
) -> Result<(), AlgebraError> {
    for s in sources {
        if !algebra.same_shape(dest, s) {
            return Err(AlgebraError::ShapeMismatch {
                expected: algebra.shape(dest),
                actual: algebra.shape(s),
            });
        }
    }
    Ok(())
}
