//! Flat reference evaluator.

use chainflow_core::{ChainParams, KernelError};

use crate::check_lengths;

/// Momentum derivative of the whole chain, evaluated index by index on the
/// calling thread.
///
/// Each index recomputes both of its pair couplings from scratch rather
/// than carrying them along, which makes this an independent check on the
/// block kernels. The floating-point operations per index are the same, so
/// results agree bit for bit.
pub fn chain_force(params: &ChainParams, q: &[f64], dpdt: &mut [f64]) -> Result<(), KernelError> {
    check_lengths(q, dpdt)?;
    let onsite = params.kappa.minus_one();
    let coupling = params.lambda.minus_one();
    let n = q.len();
    for i in 0..n {
        let left = if i > 0 { Some(q[i - 1]) } else { params.left.anchor() };
        let right = if i + 1 < n {
            Some(q[i + 1])
        } else {
            params.right.anchor()
        };
        let pull_left = left.map_or(0.0, |ql| coupling.signed_pow(ql - q[i]));
        let pull_right = right.map_or(0.0, |qr| coupling.signed_pow(q[i] - qr));
        dpdt[i] = -onsite.signed_pow(q[i]) + pull_left - pull_right;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::force::BlockKernel;
    use chainflow_core::Boundary;

    #[test]
    fn agrees_with_single_block_kernel() {
        let q: Vec<f64> = (0..17).map(|i| ((i as f64) * 0.37).sin()).collect();
        for (l, r) in [
            (Boundary::Pinned, Boundary::Pinned),
            (Boundary::Free, Boundary::Coupled(0.25)),
            (Boundary::Coupled(-1.0), Boundary::Free),
        ] {
            let params = ChainParams::default().with_boundaries(l, r);
            let mut flat = vec![0.0; q.len()];
            let mut block = vec![0.0; q.len()];
            chain_force(&params, &q, &mut flat).unwrap();
            BlockKernel::new(&params).single_block(&q, &mut block).unwrap();
            assert_eq!(flat, block);
        }
    }

    #[test]
    fn free_chain_forces_sum_to_onsite_only() {
        // Pair forces cancel; only on-site terms remain.
        let params = ChainParams::new(2.0, 4.0).with_boundaries(Boundary::Free, Boundary::Free);
        let q = [0.5, -0.25, 0.75, 0.0];
        let mut dpdt = [0.0; 4];
        chain_force(&params, &q, &mut dpdt).unwrap();
        let total: f64 = dpdt.iter().sum();
        let onsite: f64 = q.iter().map(|x| -x).sum();
        assert!((total - onsite).abs() < 1e-12);
    }
}
