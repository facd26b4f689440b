//! Whole-chain force on a contiguous vector.

use chainflow_core::ChainParams;
use chainflow_integrate::{ForceField, StepperError};
use chainflow_kernel::{chain_force, check_finite};

/// The chain force evaluated directly on `Vec<f64>`, on the calling thread.
///
/// Produces bit-identical results to [`ChainForce`](crate::ChainForce) for
/// every partition of the same chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatChainForce {
    params: ChainParams,
    check_finite: bool,
}

impl FlatChainForce {
    /// Flat force for a chain with `params`, with the finite check on.
    pub fn new(params: ChainParams) -> Self {
        Self {
            params,
            check_finite: true,
        }
    }

    /// Enable or disable the non-finite check.
    pub fn with_finite_check(mut self, enabled: bool) -> Self {
        self.check_finite = enabled;
        self
    }

    /// The chain parameters.
    pub fn params(&self) -> &ChainParams {
        &self.params
    }
}

impl ForceField<Vec<f64>> for FlatChainForce {
    fn force(&self, q: &Vec<f64>, dpdt: &mut Vec<f64>) -> Result<(), StepperError> {
        chain_force(&self.params, q, dpdt)?;
        if self.check_finite {
            check_finite(None, dpdt)?;
        }
        Ok(())
    }
}
