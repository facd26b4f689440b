//! Property test: splitting a chain into blocks never changes its forces.
//!
//! Cuts a random chain at a random block length and evaluates each block
//! through the `BlockStencil` entry point with neighbour scalars taken from
//! the adjacent blocks, then compares against the flat reference.

use chainflow_core::{Boundary, ChainParams, Exponent};
use chainflow_kernel::{chain_force, BlockKernel, BlockStencil, PhaseChain};
use proptest::prelude::*;

fn boundary() -> impl Strategy<Value = Boundary> {
    prop_oneof![
        Just(Boundary::Free),
        Just(Boundary::Pinned),
        (-1.0f64..1.0).prop_map(Boundary::Coupled),
    ]
}

fn exponent() -> impl Strategy<Value = Exponent> {
    prop_oneof![
        (1.5f64..6.0).prop_map(Exponent::Real),
        (2i32..8).prop_map(Exponent::Integer),
    ]
}

/// Evaluate `stencil` block by block with block length `g`.
fn blockwise<S: BlockStencil>(stencil: &S, x: &[f64], g: usize) -> Vec<f64> {
    let mut out = vec![0.0; x.len()];
    let m = x.len() / g;
    for b in 0..m {
        let range = b * g..(b + 1) * g;
        let left = (b > 0).then(|| x[range.start - 1]);
        let right = (b + 1 < m).then(|| x[range.end]);
        stencil
            .apply(&x[range.clone()], left, right, &mut out[range])
            .unwrap();
    }
    out
}

proptest! {
    #[test]
    fn force_blocks_match_reference(
        m in 1usize..6,
        g in 1usize..9,
        kappa in exponent(),
        lambda in exponent(),
        left in boundary(),
        right in boundary(),
        seed in proptest::collection::vec(-1.5f64..1.5, 48),
    ) {
        let n = m * g;
        let q = &seed[..n];
        let params = ChainParams { kappa, lambda, left, right };
        let mut flat = vec![0.0; n];
        chain_force(&params, q, &mut flat).unwrap();
        let blocks = blockwise(&BlockKernel::new(&params), q, g);
        prop_assert_eq!(flat, blocks);
    }

    #[test]
    fn phase_blocks_match_whole(
        m in 1usize..6,
        g in 1usize..9,
        seed in proptest::collection::vec(0.0f64..6.3, 48),
    ) {
        let n = m * g;
        let x = &seed[..n];
        let pc = PhaseChain::default();
        let mut whole = vec![0.0; n];
        pc.rhs(x, &mut whole).unwrap();
        prop_assert_eq!(whole, blockwise(&pc, x, g));
    }
}
