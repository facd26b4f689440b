//! Elementwise operations applied by an [`Algebra`](crate::Algebra).

use chainflow_core::KernelError;
use smallvec::SmallVec;

use crate::error::AlgebraError;

const MAX_OPERANDS: usize = 9;

/// Scaled sum `result[j] = Σ α_k·x_k[j]`.
///
/// The coefficient count fixes the operand count, which must lie in
/// `MIN_ARITY..=MAX_ARITY`.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSum {
    coeffs: SmallVec<[f64; MAX_OPERANDS]>,
}

impl ScaleSum {
    /// Fewest operands an operation may take.
    pub const MIN_ARITY: usize = 2;
    /// Most operands an operation may take.
    pub const MAX_ARITY: usize = MAX_OPERANDS;

    /// Operation with the given coefficients, one per operand.
    pub fn new(coeffs: impl IntoIterator<Item = f64>) -> Self {
        Self {
            coeffs: coeffs.into_iter().collect(),
        }
    }

    /// `α1·x1 + α2·x2`.
    pub fn scale_sum2(a1: f64, a2: f64) -> Self {
        Self::new([a1, a2])
    }

    /// Number of operands.
    pub fn arity(&self) -> usize {
        self.coeffs.len()
    }

    /// The coefficients in operand order.
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Check that `operands` matches the coefficient count and the
    /// supported range.
    pub fn check_arity(&self, operands: usize) -> Result<(), AlgebraError> {
        let arity = self.arity();
        if operands != arity || !(Self::MIN_ARITY..=Self::MAX_ARITY).contains(&arity) {
            return Err(AlgebraError::ArityMismatch {
                expected: arity,
                actual: operands,
            });
        }
        Ok(())
    }

    /// `out[j] = Σ α_k·sources[k][j]`.
    pub fn apply(&self, sources: &[&[f64]], out: &mut [f64]) -> Result<(), KernelError> {
        debug_assert_eq!(sources.len(), self.arity());
        for s in sources {
            if s.len() != out.len() {
                return Err(KernelError::LengthMismatch {
                    expected: out.len(),
                    actual: s.len(),
                });
            }
        }
        let (Some((&a0, coeffs)), Some((first, rest))) =
            (self.coeffs.split_first(), sources.split_first())
        else {
            return Ok(());
        };
        for (o, x) in out.iter_mut().zip(first.iter()) {
            *o = a0 * x;
        }
        for (a, s) in coeffs.iter().zip(rest) {
            for (o, x) in out.iter_mut().zip(s.iter()) {
                *o += a * x;
            }
        }
        Ok(())
    }

    /// `out[j] = α_0·out[j] + Σ α_{k+1}·sources[k][j]`.
    ///
    /// Performs the same floating-point operations, in the same order, as
    /// [`apply`](Self::apply) with `out` as the first operand.
    pub fn apply_in_place(&self, out: &mut [f64], sources: &[&[f64]]) -> Result<(), KernelError> {
        debug_assert_eq!(sources.len() + 1, self.arity());
        for s in sources {
            if s.len() != out.len() {
                return Err(KernelError::LengthMismatch {
                    expected: out.len(),
                    actual: s.len(),
                });
            }
        }
        let Some((&a0, coeffs)) = self.coeffs.split_first() else {
            return Ok(());
        };
        for o in out.iter_mut() {
            *o *= a0;
        }
        for (a, s) in coeffs.iter().zip(sources) {
            for (o, x) in out.iter_mut().zip(s.iter()) {
                *o += a * x;
            }
        }
        Ok(())
    }
}
