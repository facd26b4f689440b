//! Phase-chain kernel.
//!
//! A first-order chain of phase oscillators with open ends:
//! `dx_i/dt = c(x_{i+1} − x_i) + c(x_{i-1} − x_i)` where
//! `c(x) = sin x − γ(1 − cos x)`. Missing neighbours at the chain ends
//! contribute nothing.

use chainflow_core::KernelError;

use crate::{check_lengths, BlockStencil};

/// Phase-chain right-hand side with coupling asymmetry `gamma`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseChain {
    /// Asymmetry of the coupling function.
    pub gamma: f64,
}

impl Default for PhaseChain {
    fn default() -> Self {
        Self { gamma: 1.2 }
    }
}

impl PhaseChain {
    /// Phase chain with the given asymmetry.
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    /// The coupling function `c(x)`.
    #[inline]
    pub fn coupling(&self, x: f64) -> f64 {
        x.sin() - self.gamma * (1.0 - x.cos())
    }

    /// Right-hand side of the whole chain.
    pub fn rhs(&self, x: &[f64], dxdt: &mut [f64]) -> Result<(), KernelError> {
        self.apply(x, None, None, dxdt)
    }
}

impl BlockStencil for PhaseChain {
    fn apply(
        &self,
        x: &[f64],
        left: Option<f64>,
        right: Option<f64>,
        out: &mut [f64],
    ) -> Result<(), KernelError> {
        check_lengths(x, out)?;
        let n = x.len();
        for i in 0..n {
            let prev = if i > 0 { Some(x[i - 1]) } else { left };
            let next = if i + 1 < n { Some(x[i + 1]) } else { right };
            let mut v = 0.0;
            if let Some(xn) = next {
                v += self.coupling(xn - x[i]);
            }
            if let Some(xp) = prev {
                v += self.coupling(xp - x[i]);
            }
            out[i] = v;
        }
        Ok(())
    }
}
