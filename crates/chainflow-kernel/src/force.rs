//! Block force kernels for the nonlinear oscillator chain.
//!
//! For oscillator `k` of a block the momentum derivative is
//!
//! ```text
//! dpdt[k] = -signed_pow(q[k], κ-1)
//!           + signed_pow(q[k-1] - q[k], λ-1)
//!           - signed_pow(q[k] - q[k+1], λ-1)
//! ```
//!
//! The coupling computed for the pair `(k, k+1)` is reused, with opposite
//! sign, as the left coupling of `k+1`. At a block edge the neighbour
//! block's boundary scalar stands in for `q[-1]` or `q[G]`; at a chain end
//! the configured [`Boundary`] does.

use chainflow_core::{BlockId, Boundary, ChainParams, Exponent, KernelError};

use crate::{check_lengths, BlockStencil};

/// Where a block sits in the chain, which decides its boundary inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockPosition {
    /// Leftmost of several blocks: needs only the right neighbour.
    First,
    /// Interior block: needs both neighbours.
    Center,
    /// Rightmost of several blocks: needs only the left neighbour.
    Last,
    /// The only block: both ends are chain ends.
    Single,
}

impl BlockPosition {
    /// Position of `block` in a chain of `block_count` blocks.
    pub fn of(block: BlockId, block_count: usize) -> Self {
        let b = block.index();
        match (b == 0, b + 1 == block_count) {
            (true, true) => Self::Single,
            (true, false) => Self::First,
            (false, true) => Self::Last,
            (false, false) => Self::Center,
        }
    }

    /// Whether this block reads the preceding block's last position.
    pub fn has_left_neighbour(self) -> bool {
        matches!(self, Self::Center | Self::Last)
    }

    /// Whether this block reads the following block's first position.
    pub fn has_right_neighbour(self) -> bool {
        matches!(self, Self::First | Self::Center)
    }
}

/// Momentum-derivative kernel for one chain configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockKernel {
    onsite: Exponent,
    coupling: Exponent,
    left: Boundary,
    right: Boundary,
}

impl BlockKernel {
    /// Kernel for the given chain parameters.
    pub fn new(params: &ChainParams) -> Self {
        Self {
            onsite: params.kappa.minus_one(),
            coupling: params.lambda.minus_one(),
            left: params.left,
            right: params.right,
        }
    }

    /// Leftmost block of a multi-block chain.
    pub fn first_block(&self, q: &[f64], right: f64, dpdt: &mut [f64]) -> Result<(), KernelError> {
        self.coupled(q, self.left.anchor(), Some(right), dpdt)
    }

    /// Interior block.
    pub fn center_block(
        &self,
        q: &[f64],
        left: f64,
        right: f64,
        dpdt: &mut [f64],
    ) -> Result<(), KernelError> {
        self.coupled(q, Some(left), Some(right), dpdt)
    }

    /// Rightmost block of a multi-block chain.
    pub fn last_block(&self, q: &[f64], left: f64, dpdt: &mut [f64]) -> Result<(), KernelError> {
        self.coupled(q, Some(left), self.right.anchor(), dpdt)
    }

    /// A chain consisting of one block.
    pub fn single_block(&self, q: &[f64], dpdt: &mut [f64]) -> Result<(), KernelError> {
        self.coupled(q, self.left.anchor(), self.right.anchor(), dpdt)
    }

    /// `left`/`right` are the coupling partners outside the block, `None`
    /// meaning no coupling term on that side.
    fn coupled(
        &self,
        q: &[f64],
        left: Option<f64>,
        right: Option<f64>,
        dpdt: &mut [f64],
    ) -> Result<(), KernelError> {
        check_lengths(q, dpdt)?;
        let n = q.len();
        let mut coupling_left = match left {
            Some(ql) => self.coupling.signed_pow(ql - q[0]),
            None => 0.0,
        };
        for k in 0..n {
            let coupling_right = if k + 1 < n {
                self.coupling.signed_pow(q[k] - q[k + 1])
            } else {
                match right {
                    Some(qr) => self.coupling.signed_pow(q[k] - qr),
                    None => 0.0,
                }
            };
            dpdt[k] = -self.onsite.signed_pow(q[k]) + coupling_left - coupling_right;
            coupling_left = coupling_right;
        }
        Ok(())
    }
}

impl BlockStencil for BlockKernel {
    fn apply(
        &self,
        x: &[f64],
        left: Option<f64>,
        right: Option<f64>,
        out: &mut [f64],
    ) -> Result<(), KernelError> {
        match (left, right) {
            (None, None) => self.single_block(x, out),
            (None, Some(r)) => self.first_block(x, r, out),
            (Some(l), Some(r)) => self.center_block(x, l, r, out),
            (Some(l), None) => self.last_block(x, l, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel(left: Boundary, right: Boundary) -> BlockKernel {
        BlockKernel::new(&ChainParams::default().with_boundaries(left, right))
    }

    #[test]
    fn positions() {
        assert_eq!(BlockPosition::of(BlockId(0), 1), BlockPosition::Single);
        assert_eq!(BlockPosition::of(BlockId(0), 3), BlockPosition::First);
        assert_eq!(BlockPosition::of(BlockId(1), 3), BlockPosition::Center);
        assert_eq!(BlockPosition::of(BlockId(2), 3), BlockPosition::Last);
        assert!(!BlockPosition::First.has_left_neighbour());
        assert!(BlockPosition::Last.has_left_neighbour());
    }

    #[test]
    fn zero_positions_give_zero_force() {
        let k = kernel(Boundary::Pinned, Boundary::Pinned);
        let q = [0.0; 4];
        let mut dpdt = [1.0; 4];
        k.single_block(&q, &mut dpdt).unwrap();
        assert_eq!(dpdt, [0.0; 4]);
    }

    #[test]
    fn harmonic_case_matches_hand_computation() {
        // κ = λ = 2 makes every force linear.
        let params = ChainParams::new(2.0, 2.0).with_boundaries(Boundary::Free, Boundary::Free);
        let k = BlockKernel::new(&params);
        let q = [1.0, 0.0, -1.0];
        let mut dpdt = [0.0; 3];
        k.single_block(&q, &mut dpdt).unwrap();
        // -q0 - (q0-q1), -q1 + (q0-q1) - (q1-q2), -q2 + (q1-q2)
        assert_eq!(dpdt, [-2.0, 0.0, 2.0]);
    }

    #[test]
    fn pinned_end_pulls_toward_origin() {
        let params = ChainParams::new(2.0, 2.0);
        let k = BlockKernel::new(&params);
        let q = [1.0];
        let mut dpdt = [0.0];
        k.single_block(&q, &mut dpdt).unwrap();
        // on-site -1, left pin -1, right pin -1
        assert_eq!(dpdt, [-3.0]);
    }

    #[test]
    fn coupled_anchor_substitutes_value() {
        let params = ChainParams::new(2.0, 2.0)
            .with_boundaries(Boundary::Coupled(1.0), Boundary::Free);
        let k = BlockKernel::new(&params);
        let mut dpdt = [0.0];
        k.single_block(&[1.0], &mut dpdt).unwrap();
        // on-site only: the left pair has zero extension.
        assert_eq!(dpdt, [-1.0]);
    }

    #[test]
    fn split_block_equals_whole() {
        let k = kernel(Boundary::Pinned, Boundary::Pinned);
        let q = [0.3, -0.7, 1.1, 0.05, -0.4, 0.9];
        let mut whole = [0.0; 6];
        k.single_block(&q, &mut whole).unwrap();

        let mut parts = [0.0; 6];
        let (a, rest) = parts.split_at_mut(2);
        let (b, c) = rest.split_at_mut(2);
        k.first_block(&q[0..2], q[2], a).unwrap();
        k.center_block(&q[2..4], q[1], q[4], b).unwrap();
        k.last_block(&q[4..6], q[3], c).unwrap();
        assert_eq!(whole, parts);
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let k = kernel(Boundary::Free, Boundary::Free);
        let mut dpdt = [0.0; 2];
        assert_eq!(
            k.single_block(&[1.0, 2.0, 3.0], &mut dpdt),
            Err(KernelError::LengthMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(k.single_block(&[], &mut []).is_err());
    }
}
