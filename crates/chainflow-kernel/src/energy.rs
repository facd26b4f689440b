//! Energy diagnostic.
//!
//! Used to verify integrators, never inside a step.

use chainflow_core::{ChainParams, KernelError};

/// Total energy of the chain.
///
/// `H = Σ p_i²/2 + Σ |q_i|^κ/κ + Σ |q_i − q_{i+1}|^λ/λ`, plus a half-weight
/// term `½·|q_end − anchor|^λ/λ` at each anchored end. Free ends contribute
/// no end term.
pub fn energy(params: &ChainParams, q: &[f64], p: &[f64]) -> Result<f64, KernelError> {
    if q.len() != p.len() {
        return Err(KernelError::LengthMismatch {
            expected: q.len(),
            actual: p.len(),
        });
    }
    let kappa = params.kappa;
    let lambda = params.lambda;
    let mut e = 0.0;
    for (i, (&qi, &pi)) in q.iter().zip(p).enumerate() {
        e += 0.5 * pi * pi + kappa.abs_pow(qi) / kappa.value();
        if let Some(&next) = q.get(i + 1) {
            e += lambda.abs_pow(qi - next) / lambda.value();
        }
    }
    if let (Some(&first), Some(anchor)) = (q.first(), params.left.anchor()) {
        e += 0.5 * lambda.abs_pow(first - anchor) / lambda.value();
    }
    if let (Some(&last), Some(anchor)) = (q.last(), params.right.anchor()) {
        e += 0.5 * lambda.abs_pow(last - anchor) / lambda.value();
    }
    Ok(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainflow_core::Boundary;

    #[test]
    fn kinetic_only() {
        let e = energy(
            &ChainParams::default(),
            &[0.0; 4],
            &[1.0, -2.0, 0.5, 3.0],
        )
        .unwrap();
        assert!((e - 7.125).abs() < 1e-12, "e = {e}");
    }

    #[test]
    fn pinned_ends_add_half_weight_terms() {
        let params = ChainParams::new(2.0, 2.0);
        // on-site 1/2, two half-weight end terms of 1/4 each.
        let e = energy(&params, &[1.0], &[0.0]).unwrap();
        assert!((e - 1.0).abs() < 1e-15);

        let free = params.with_boundaries(Boundary::Free, Boundary::Free);
        let e = energy(&free, &[1.0], &[0.0]).unwrap();
        assert!((e - 0.5).abs() < 1e-15);
    }

    #[test]
    fn pair_term() {
        let params =
            ChainParams::new(2.0, 4.0).with_boundaries(Boundary::Free, Boundary::Free);
        // |1-(-1)|^4/4 = 4, on-site 1/2 + 1/2.
        let e = energy(&params, &[1.0, -1.0], &[0.0, 0.0]).unwrap();
        assert!((e - 5.0).abs() < 1e-12);
    }

    #[test]
    fn length_mismatch() {
        assert!(energy(&ChainParams::default(), &[0.0; 3], &[0.0; 2]).is_err());
    }

    #[test]
    fn integer_exponents() {
        let params = ChainParams::new(4, 6).with_boundaries(Boundary::Free, Boundary::Free);
        let e = energy(&params, &[-1.0, 1.0], &[0.0, 0.0]).unwrap();
        // 1/4 + 1/4 + 2^6/6
        assert!((e - (0.5 + 64.0 / 6.0)).abs() < 1e-12);
    }
}
