//! Test fixtures for chainflow development.
//!
//! Seeded initial conditions, conversions between flat and partitioned
//! state, and kernels that fail on demand.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use chainflow_task::BlockState;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// `n` values drawn uniformly from `[-amplitude, amplitude)`.
///
/// Identical seeds give identical sequences.
pub fn uniform(n: usize, amplitude: f64, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| amplitude * rng.random_range(-1.0..1.0))
        .collect()
}

/// Random momenta in `[-1, 1)`, the usual starting point for a run.
pub fn random_momenta(n: usize, seed: u64) -> Vec<f64> {
    uniform(n, 1.0, seed)
}

/// Split a flat vector into resolved blocks of `block_len`.
///
/// # Panics
///
/// Panics if `block_len` is zero.
pub fn blocks_from_flat(values: &[f64], block_len: usize) -> BlockState {
    BlockState::from_values(values.chunks(block_len).map(<[f64]>::to_vec))
}

/// Wait for every block and concatenate.
///
/// # Panics
///
/// Panics if any slot is poisoned.
pub fn flatten(state: &BlockState) -> Vec<f64> {
    state.flatten().expect("state slot poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_seeded_and_bounded() {
        let a = uniform(100, 0.5, 7);
        assert_eq!(a, uniform(100, 0.5, 7));
        assert_ne!(a, uniform(100, 0.5, 8));
        assert!(a.iter().all(|v| (-0.5..0.5).contains(v)));
    }

    #[test]
    fn block_round_trip() {
        let v = random_momenta(12, 1);
        let b = blocks_from_flat(&v, 4);
        assert_eq!(b.len(), 3);
        assert_eq!(flatten(&b), v);
    }
}
