//! Numeric kernels for chainflow.
//!
//! Everything here is synchronous and allocation-free per call. Kernels
//! operate on one block of a partitioned chain and receive their
//! neighbours' boundary scalars explicitly, so the same code serves the
//! task graph (one call per block) and the flat reference (one call for
//! the whole chain).
//!
//! # Kernels
//!
//! - [`BlockKernel`]: momentum derivative of the nonlinear oscillator chain.
//! - [`PhaseChain`]: right-hand side of the first-order phase chain.
//! - [`energy`]: total energy, for verification only.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod energy;
pub mod finite;
pub mod force;
pub mod phase;
pub mod reference;

pub use energy::energy;
pub use finite::check_finite;
pub use force::{BlockKernel, BlockPosition};
pub use phase::PhaseChain;
pub use reference::chain_force;

use chainflow_core::KernelError;

/// A nearest-neighbour kernel evaluated one block at a time.
///
/// `left` and `right` carry the last value of the preceding block and the
/// first value of the following block. `None` marks a chain end, where the
/// kernel applies its own boundary rule.
pub trait BlockStencil: Send + Sync + 'static {
    /// Write the derivative of block `x` into `out`.
    ///
    /// Fails with [`KernelError::LengthMismatch`] if `out.len() != x.len()`
    /// or the block is empty.
    fn apply(
        &self,
        x: &[f64],
        left: Option<f64>,
        right: Option<f64>,
        out: &mut [f64],
    ) -> Result<(), KernelError>;
}

pub(crate) fn check_lengths(x: &[f64], out: &[f64]) -> Result<(), KernelError> {
    if x.is_empty() || x.len() != out.len() {
        return Err(KernelError::LengthMismatch {
            expected: x.len().max(1),
            actual: out.len(),
        });
    }
    Ok(())
}
