//! Error types for the chainflow workspace.
//!
//! Organized by failure class: structural configuration errors detected
//! at setup ([`ConfigError`]), numeric or shape failures inside a block
//! kernel ([`KernelError`]), and the reason an async slot was poisoned
//! ([`TaskFault`]).

use std::error::Error;
use std::fmt;

use crate::id::BlockId;

// ── ConfigError ────────────────────────────────────────────────────

/// Structural errors detected before any work is scheduled.
///
/// All of these are fatal: no partial execution happens once one is
/// returned.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Chain length or block length is zero.
    EmptyPartition {
        /// Configured chain length.
        chain_len: usize,
        /// Configured block length.
        block_len: usize,
    },
    /// Block length does not divide the chain length.
    IndivisibleChain {
        /// Configured chain length.
        chain_len: usize,
        /// Configured block length.
        block_len: usize,
    },
    /// Block count exceeds the range of [`BlockId`].
    TooManyBlocks {
        /// The block count that overflowed.
        value: usize,
    },
    /// Step count is zero.
    ZeroSteps,
    /// Time step is NaN, infinite, zero or negative.
    InvalidTimeStep {
        /// The rejected value.
        value: f64,
    },
    /// An exponent is unusable.
    InvalidExponent {
        /// Which exponent (`"kappa"` or `"lambda"`).
        name: &'static str,
        /// Description of the violation.
        reason: String,
    },
    /// A `Coupled` boundary anchor is not finite.
    InvalidBoundary {
        /// Which end (`"left"` or `"right"`).
        end: &'static str,
        /// The rejected anchor value.
        value: f64,
    },
    /// Requested integrator stage count has no coefficient table.
    UnsupportedStages {
        /// The rejected stage count.
        stages: usize,
    },
    /// Two states (or a state and its partition) disagree in shape.
    ShapeMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPartition {
                chain_len,
                block_len,
            } => write!(
                f,
                "chain length {chain_len} and block length {block_len} must both be non-zero"
            ),
            Self::IndivisibleChain {
                chain_len,
                block_len,
            } => write!(
                f,
                "block length {block_len} does not divide chain length {chain_len}"
            ),
            Self::TooManyBlocks { value } => {
                write!(f, "block count {value} exceeds u32::MAX")
            }
            Self::ZeroSteps => write!(f, "step count must be at least 1"),
            Self::InvalidTimeStep { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::InvalidExponent { name, reason } => {
                write!(f, "invalid exponent {name}: {reason}")
            }
            Self::InvalidBoundary { end, value } => {
                write!(f, "{end} boundary anchor must be finite, got {value}")
            }
            Self::UnsupportedStages { stages } => {
                write!(f, "no coefficient table for {stages} stages")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "shape mismatch: expected {expected}, got {actual}")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

// ── KernelError ────────────────────────────────────────────────────

/// Failures raised while evaluating a block kernel or projection.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelError {
    /// A non-finite value (NaN or ±∞) was produced.
    NonFinite {
        /// Block that produced the value, if known.
        block: Option<BlockId>,
        /// Index within the block (or chain, for flat evaluation).
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// Input and output buffers disagree in length, or a buffer is empty.
    LengthMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite {
                block,
                index,
                value,
            } => {
                write!(f, "non-finite value {value} at index {index}")?;
                if let Some(b) = block {
                    write!(f, " of block {b}")?;
                }
                Ok(())
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "buffer length mismatch: expected {expected}, got {actual}")
            }
        }
    }
}

impl Error for KernelError {}

// ── TaskFault ──────────────────────────────────────────────────────

/// The reason an async slot resolved as poisoned.
///
/// Faults are cloned into every dependent slot unchanged, so the top-level
/// wait observes the original cause rather than a chain of wrappers.
#[derive(Clone, Debug, PartialEq)]
pub enum TaskFault {
    /// A kernel or projection returned an error.
    Kernel(KernelError),
    /// The task body panicked.
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },
    /// The producer was dropped without resolving its slot.
    Abandoned,
}

impl fmt::Display for TaskFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kernel(e) => write!(f, "kernel fault: {e}"),
            Self::Panicked { message } => write!(f, "task panicked: {message}"),
            Self::Abandoned => write!(f, "producer dropped before resolving its slot"),
        }
    }
}

impl Error for TaskFault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kernel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KernelError> for TaskFault {
    fn from(e: KernelError) -> Self {
        Self::Kernel(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_display_names_block() {
        let e = KernelError::NonFinite {
            block: Some(BlockId(3)),
            index: 5,
            value: f64::NAN,
        };
        assert_eq!(e.to_string(), "non-finite value NaN at index 5 of block 3");
    }

    #[test]
    fn task_fault_sources_kernel_error() {
        let fault = TaskFault::from(KernelError::LengthMismatch {
            expected: 4,
            actual: 2,
        });
        assert!(fault.source().is_some());
        assert!(TaskFault::Abandoned.source().is_none());
    }

    #[test]
    fn indivisible_chain_display() {
        let e = ConfigError::IndivisibleChain {
            chain_len: 10,
            block_len: 3,
        };
        assert_eq!(e.to_string(), "block length 3 does not divide chain length 10");
    }
}
