//! Exponent representation and the signed power rule.
//!
//! The chain potential uses two exponents: κ for the on-site term and λ for
//! the nearest-neighbour coupling. Both may be given as real or integer
//! values; the caller chooses explicitly.

use std::fmt;

use crate::error::ConfigError;

/// `sign(x)·|x|^k`, with `signed_pow(0, k) == 0` for every `k`.
///
/// The zero rule also holds for negative and fractional `k`, where a plain
/// `powf` would yield ∞ or NaN.
#[inline]
pub fn signed_pow(x: f64, k: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum() * x.abs().powf(k)
    }
}

/// `|x|^k`, with `abs_pow(0, k) == 0` for every `k`.
#[inline]
pub fn abs_pow(x: f64, k: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.abs().powf(k)
    }
}

/// A potential exponent.
///
/// `Real` evaluates through `powf`; `Integer` evaluates through `powi`,
/// which is exact on negative bases. Both compute `sign(x)·|x|^k` for
/// [`Exponent::signed_pow`], so they agree wherever both are finite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Exponent {
    /// Real-valued exponent.
    Real(f64),
    /// Integer exponent.
    Integer(i32),
}

impl Exponent {
    /// The exponent as an `f64`.
    pub fn value(self) -> f64 {
        match self {
            Self::Real(k) => k,
            Self::Integer(k) => f64::from(k),
        }
    }

    /// The exponent minus one, in the same representation.
    ///
    /// Forces are derivatives of the potential, so kernels raise to `κ-1`
    /// and `λ-1`.
    pub fn minus_one(self) -> Self {
        match self {
            Self::Real(k) => Self::Real(k - 1.0),
            Self::Integer(k) => Self::Integer(k.saturating_sub(1)),
        }
    }

    /// `sign(x)·|x|^k` with the zero rule of [`signed_pow`].
    #[inline]
    pub fn signed_pow(self, x: f64) -> f64 {
        match self {
            Self::Real(k) => signed_pow(x, k),
            Self::Integer(k) => {
                if x == 0.0 {
                    0.0
                } else {
                    x.signum() * x.abs().powi(k)
                }
            }
        }
    }

    /// `|x|^k` with the zero rule of [`abs_pow`].
    #[inline]
    pub fn abs_pow(self, x: f64) -> f64 {
        match self {
            Self::Real(k) => abs_pow(x, k),
            Self::Integer(k) => {
                if x == 0.0 {
                    0.0
                } else {
                    x.abs().powi(k)
                }
            }
        }
    }

    /// Reject non-finite exponents and exponents below 1.
    ///
    /// `name` identifies the exponent in the returned error.
    pub fn validate(self, name: &'static str) -> Result<(), ConfigError> {
        let k = self.value();
        if !k.is_finite() {
            return Err(ConfigError::InvalidExponent {
                name,
                reason: format!("{k} is not finite"),
            });
        }
        if k < 1.0 {
            return Err(ConfigError::InvalidExponent {
                name,
                reason: format!("{k} is below 1"),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Exponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(k) => write!(f, "{k}"),
            Self::Integer(k) => write!(f, "{k}i"),
        }
    }
}

impl From<f64> for Exponent {
    fn from(k: f64) -> Self {
        Self::Real(k)
    }
}

impl From<i32> for Exponent {
    fn from(k: i32) -> Self {
        Self::Integer(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_maps_to_zero_for_any_exponent() {
        for k in [-2.5, -1.0, 0.0, 0.5, 1.0, 3.5] {
            assert_eq!(signed_pow(0.0, k), 0.0);
            assert_eq!(abs_pow(0.0, k), 0.0);
            assert_eq!(Exponent::Real(k).signed_pow(0.0), 0.0);
        }
        for k in [-3, 0, 1, 4] {
            assert_eq!(Exponent::Integer(k).signed_pow(0.0), 0.0);
            assert_eq!(Exponent::Integer(k).abs_pow(0.0), 0.0);
        }
    }

    #[test]
    fn integer_matches_real_on_negative_base() {
        let int = Exponent::Integer(3);
        let real = Exponent::Real(3.0);
        let x = -1.7;
        let diff = (int.signed_pow(x) - real.signed_pow(x)).abs();
        assert!(diff < 1e-12, "diff = {diff}");
        assert!(int.signed_pow(x) < 0.0);
    }

    #[test]
    fn even_integer_exponent_keeps_sign() {
        assert_eq!(Exponent::Integer(2).signed_pow(-3.0), -9.0);
        assert_eq!(Exponent::Integer(2).abs_pow(-3.0), 9.0);
    }

    #[test]
    fn minus_one_keeps_representation() {
        assert_eq!(Exponent::Real(4.5).minus_one(), Exponent::Real(3.5));
        assert_eq!(Exponent::Integer(6).minus_one(), Exponent::Integer(5));
    }

    #[test]
    fn validate_rejects_small_and_non_finite() {
        assert!(Exponent::Real(3.5).validate("kappa").is_ok());
        assert!(Exponent::Integer(1).validate("kappa").is_ok());
        assert!(matches!(
            Exponent::Real(0.5).validate("kappa"),
            Err(ConfigError::InvalidExponent { name: "kappa", .. })
        ));
        assert!(Exponent::Real(f64::NAN).validate("lambda").is_err());
        assert!(Exponent::Real(f64::INFINITY).validate("lambda").is_err());
        assert!(Exponent::Integer(0).validate("lambda").is_err());
    }

    proptest! {
        #[test]
        fn signed_pow_is_odd(x in -1e3f64..1e3, k in 0.5f64..6.0) {
            prop_assert_eq!(signed_pow(-x, k), -signed_pow(x, k));
        }

        #[test]
        fn signed_pow_preserves_sign(x in -1e3f64..1e3, k in 0.5f64..6.0) {
            let y = signed_pow(x, k);
            if x > 0.0 {
                prop_assert!(y > 0.0);
            } else if x < 0.0 {
                prop_assert!(y < 0.0);
            }
        }
    }
}
