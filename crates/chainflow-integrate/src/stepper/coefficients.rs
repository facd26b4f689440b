//! Coefficient tables for the parallel Adams–Bashforth stepper.
//!
//! For `s` stages the nodes are `c_i = 1 + x_i`, where `x_i` are the
//! Gauss–Lobatto points on `[0, 1]` (both endpoints plus the roots of
//! `d/dx P_{s-1}(2x − 1)`), ordered so that `c_0 = 2` and `c_{s-1} = 1`.
//! Weight `w_ij` integrates the Lagrange basis polynomial of node `j`
//! (on the shifted nodes `c_j − 1`) from 1 to `c_i`.
//!
//! Tables are computed once for every supported stage count and cached.

use std::f64::consts::PI;
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::error::StepperError;

/// Node positions and integration weights for one stage count.
#[derive(Clone, Debug, PartialEq)]
pub struct PabTableau {
    nodes: Vec<f64>,
    weights: Vec<Vec<f64>>,
}

static TABLES: OnceLock<IndexMap<usize, Arc<PabTableau>>> = OnceLock::new();

impl PabTableau {
    /// Fewest supported stages.
    pub const MIN_STAGES: usize = 2;
    /// Most supported stages.
    pub const MAX_STAGES: usize = 8;

    /// The cached table for `stages`.
    pub fn for_stages(stages: usize) -> Result<Arc<Self>, StepperError> {
        let tables = TABLES.get_or_init(|| {
            (Self::MIN_STAGES..=Self::MAX_STAGES)
                .map(|s| (s, Arc::new(Self::build(s))))
                .collect()
        });
        tables
            .get(&stages)
            .cloned()
            .ok_or(StepperError::UnsupportedStages { stages })
    }

    fn build(stages: usize) -> Self {
        let x = lobatto_points(stages);
        let nodes: Vec<f64> = x.iter().rev().map(|xi| 1.0 + xi).collect();
        let shifted: Vec<f64> = nodes.iter().map(|c| c - 1.0).collect();
        let basis: Vec<Vec<f64>> = (0..stages).map(|j| lagrange_basis(&shifted, j)).collect();
        let weights = nodes
            .iter()
            .map(|&c| basis.iter().map(|l| integrate(l, 1.0, c)).collect())
            .collect();
        Self { nodes, weights }
    }

    /// Number of stages.
    pub fn stages(&self) -> usize {
        self.nodes.len()
    }

    /// Nodes `c_0 = 2 > c_1 > … > c_{s-1} = 1`.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Weights of row `i`: `Y'_i = Y_0 + h·Σ_j w_ij·F_j`.
    pub fn weights(&self, i: usize) -> &[f64] {
        &self.weights[i]
    }
}

/// Gauss–Lobatto points on `[0, 1]`, ascending.
fn lobatto_points(stages: usize) -> Vec<f64> {
    let n = stages - 1;
    let mut y = Vec::with_capacity(stages);
    y.push(-1.0);
    for i in 1..n {
        // Chebyshev–Gauss–Lobatto guess, refined by Newton on P'_n.
        let mut r = -(PI * i as f64 / n as f64).cos();
        for _ in 0..100 {
            let (p, dp) = legendre(n, r);
            let d2p = (2.0 * r * dp - (n * (n + 1)) as f64 * p) / (1.0 - r * r);
            let step = dp / d2p;
            r -= step;
            if step.abs() < 1e-16 {
                break;
            }
        }
        y.push(r);
    }
    y.push(1.0);
    y.into_iter().map(|v| 0.5 * (v + 1.0)).collect()
}

/// `(P_n(y), P'_n(y))` for `|y| < 1`.
fn legendre(n: usize, y: f64) -> (f64, f64) {
    let (mut prev, mut cur) = (1.0, y);
    if n == 0 {
        return (1.0, 0.0);
    }
    for k in 1..n {
        let k = k as f64;
        let next = ((2.0 * k + 1.0) * y * cur - k * prev) / (k + 1.0);
        prev = cur;
        cur = next;
    }
    let dp = n as f64 * (y * cur - prev) / (y * y - 1.0);
    (cur, dp)
}

/// Monomial coefficients of the `j`-th Lagrange basis polynomial.
fn lagrange_basis(nodes: &[f64], j: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for (m, &tm) in nodes.iter().enumerate() {
        if m == j {
            continue;
        }
        let scale = 1.0 / (nodes[j] - tm);
        let mut next = vec![0.0; poly.len() + 1];
        for (k, &a) in poly.iter().enumerate() {
            next[k + 1] += a * scale;
            next[k] -= a * tm * scale;
        }
        poly = next;
    }
    poly
}

/// `∫_a^b Σ_k poly[k]·u^k du`.
fn integrate(poly: &[f64], a: f64, b: f64) -> f64 {
    poly.iter()
        .enumerate()
        .map(|(k, &c)| {
            let e = (k + 1) as i32;
            c * (b.powi(e) - a.powi(e)) / e as f64
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-13
    }

    #[test]
    fn supported_range() {
        assert!(PabTableau::for_stages(1).is_err());
        assert!(PabTableau::for_stages(9).is_err());
        for s in 2..=8 {
            let t = PabTableau::for_stages(s).unwrap();
            assert_eq!(t.stages(), s);
            assert_eq!(t.nodes()[0], 2.0);
            assert_eq!(t.nodes()[s - 1], 1.0);
        }
    }

    #[test]
    fn tables_are_cached() {
        let a = PabTableau::for_stages(5).unwrap();
        let b = PabTableau::for_stages(5).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn two_stages_is_adams_bashforth_2() {
        let t = PabTableau::for_stages(2).unwrap();
        assert!(close(t.weights(0)[0], 1.5));
        assert!(close(t.weights(0)[1], -0.5));
        assert_eq!(t.weights(1), &[0.0, 0.0]);
    }

    #[test]
    fn four_stage_nodes_have_closed_form() {
        let t = PabTableau::for_stages(4).unwrap();
        let r5 = 5.0_f64.sqrt();
        assert!(close(t.nodes()[1], (15.0 + r5) / 10.0));
        assert!(close(t.nodes()[2], (15.0 - r5) / 10.0));
    }

    #[test]
    fn five_stage_nodes_have_closed_form() {
        let t = PabTableau::for_stages(5).unwrap();
        let r21 = 21.0_f64.sqrt();
        assert!(close(t.nodes()[1], 1.0 + (7.0 + r21) / 14.0));
        assert!(close(t.nodes()[2], 1.5));
        assert!(close(t.nodes()[3], 1.0 + (7.0 - r21) / 14.0));
    }

    #[test]
    fn nodes_are_symmetric_and_descending() {
        for s in 2..=8 {
            let t = PabTableau::for_stages(s).unwrap();
            let c = t.nodes();
            for i in 0..s {
                assert!(close(c[i] + c[s - 1 - i], 3.0), "s={s} i={i}");
                if i + 1 < s {
                    assert!(c[i] > c[i + 1]);
                }
            }
        }
    }

    #[test]
    fn weights_integrate_polynomials_exactly() {
        for s in 2..=8 {
            let t = PabTableau::for_stages(s).unwrap();
            let tau: Vec<f64> = t.nodes().iter().map(|c| c - 1.0).collect();
            for (i, &c) in t.nodes().iter().enumerate() {
                for k in 0..s as i32 {
                    let quad: f64 = t
                        .weights(i)
                        .iter()
                        .zip(&tau)
                        .map(|(w, x)| w * x.powi(k))
                        .sum();
                    let exact = (c.powi(k + 1) - 1.0) / f64::from(k + 1);
                    assert!((quad - exact).abs() < 1e-10, "s={s} i={i} k={k}");
                }
            }
        }
    }
}
