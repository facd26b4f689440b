//! Chain-end boundary conditions.

use std::fmt;

/// How a chain end couples to the outside world.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Boundary {
    /// No coupling term at this end.
    Free,
    /// Couples to a fixed external oscillator at the origin.
    #[default]
    Pinned,
    /// Couples to a fixed external oscillator at the given position.
    Coupled(f64),
}

impl Boundary {
    /// Position of the external oscillator, or `None` for a free end.
    #[inline]
    pub fn anchor(self) -> Option<f64> {
        match self {
            Self::Free => None,
            Self::Pinned => Some(0.0),
            Self::Coupled(x) => Some(x),
        }
    }

    /// Whether the anchor is usable (always true except a non-finite `Coupled`).
    pub fn is_valid(self) -> bool {
        match self {
            Self::Coupled(x) => x.is_finite(),
            _ => true,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::Pinned => write!(f, "pinned"),
            Self::Coupled(x) => write!(f, "coupled({x})"),
        }
    }
}
