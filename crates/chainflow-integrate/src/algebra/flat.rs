//! Synchronous algebra over contiguous vectors.

use smallvec::SmallVec;

use super::{check_shapes, Algebra};
use crate::error::AlgebraError;
use crate::ops::ScaleSum;

/// Combines `Vec<f64>` states on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatAlgebra;

impl Algebra<Vec<f64>> for FlatAlgebra {
    fn combine(
        &self,
        dest: &mut Vec<f64>,
        sources: &[&Vec<f64>],
        op: &ScaleSum,
    ) -> Result<(), AlgebraError> {
        op.check_arity(sources.len())?;
        check_shapes(self, dest, sources)?;
        let views: SmallVec<[&[f64]; ScaleSum::MAX_ARITY]> =
            sources.iter().map(|s| s.as_slice()).collect();
        op.apply(&views, dest).map_err(|e| AlgebraError::Fault(e.into()))
    }

    fn accumulate(
        &self,
        dest: &mut Vec<f64>,
        sources: &[&Vec<f64>],
        op: &ScaleSum,
    ) -> Result<(), AlgebraError> {
        op.check_arity(sources.len() + 1)?;
        check_shapes(self, dest, sources)?;
        let views: SmallVec<[&[f64]; ScaleSum::MAX_ARITY]> =
            sources.iter().map(|s| s.as_slice()).collect();
        op.apply_in_place(dest, &views)
            .map_err(|e| AlgebraError::Fault(e.into()))
    }

    fn zeros_like(&self, template: &Vec<f64>) -> Vec<f64> {
        vec![0.0; template.len()]
    }

    fn same_shape(&self, a: &Vec<f64>, b: &Vec<f64>) -> bool {
        a.len() == b.len()
    }

    fn shape(&self, state: &Vec<f64>) -> usize {
        state.len()
    }
}
