//! Physical parameters of an oscillator chain.

use crate::boundary::Boundary;
use crate::error::ConfigError;
use crate::exponent::Exponent;

/// Exponents and boundary conditions of a nonlinear oscillator chain.
///
/// The Hamiltonian is
/// `H = Σ p_i²/2 + Σ |q_i|^κ/κ + Σ |q_i − q_{i+1}|^λ/λ`
/// plus half-weight end terms at anchored ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainParams {
    /// On-site exponent κ.
    pub kappa: Exponent,
    /// Coupling exponent λ.
    pub lambda: Exponent,
    /// Left chain end.
    pub left: Boundary,
    /// Right chain end.
    pub right: Boundary,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self {
            kappa: Exponent::Real(3.5),
            lambda: Exponent::Real(4.5),
            left: Boundary::Pinned,
            right: Boundary::Pinned,
        }
    }
}

impl ChainParams {
    /// Parameters with the given exponents and pinned ends.
    pub fn new(kappa: impl Into<Exponent>, lambda: impl Into<Exponent>) -> Self {
        Self {
            kappa: kappa.into(),
            lambda: lambda.into(),
            ..Self::default()
        }
    }

    /// Replace both boundary conditions.
    pub fn with_boundaries(mut self, left: Boundary, right: Boundary) -> Self {
        self.left = left;
        self.right = right;
        self
    }

    /// Check exponents and anchors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.kappa.validate("kappa")?;
        self.lambda.validate("lambda")?;
        for (end, b) in [("left", self.left), ("right", self.right)] {
            if let Boundary::Coupled(value) = b {
                if !b.is_valid() {
                    return Err(ConfigError::InvalidBoundary { end, value });
                }
            }
        }
        Ok(())
    }
}
