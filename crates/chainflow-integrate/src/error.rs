//! Errors raised by algebra operations and steppers.

use std::error::Error;
use std::fmt;

use chainflow_core::{KernelError, TaskFault};

// ── AlgebraError ───────────────────────────────────────────────────

/// A combination could not be scheduled.
#[derive(Clone, Debug, PartialEq)]
pub enum AlgebraError {
    /// Operand count does not match the operation's coefficient count, or
    /// lies outside the supported range.
    ArityMismatch {
        /// Coefficients in the operation.
        expected: usize,
        /// Operands supplied (including `dest` for accumulation).
        actual: usize,
    },
    /// States disagree in shape.
    ShapeMismatch {
        /// Shape of the destination.
        expected: usize,
        /// Shape of the offending operand.
        actual: usize,
    },
    /// A synchronous evaluation failed.
    Fault(TaskFault),
}

impl fmt::Display for AlgebraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArityMismatch { expected, actual } => write!(
                f,
                "operation takes {expected} operands, {actual} supplied"
            ),
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "state shape mismatch: expected {expected}, got {actual}")
            }
            Self::Fault(e) => write!(f, "{e}"),
        }
    }
}

impl Error for AlgebraError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fault(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TaskFault> for AlgebraError {
    fn from(e: TaskFault) -> Self {
        Self::Fault(e)
    }
}

// ── StepperError ───────────────────────────────────────────────────

/// A step could not be taken.
#[derive(Clone, Debug, PartialEq)]
pub enum StepperError {
    /// No coefficient table exists for this stage count.
    UnsupportedStages {
        /// The rejected stage count.
        stages: usize,
    },
    /// The state does not match the stepper's history buffers.
    ShapeMismatch {
        /// Shape of the history.
        expected: usize,
        /// Shape of the supplied state.
        actual: usize,
    },
    /// An algebra call was rejected.
    Algebra(AlgebraError),
    /// The right-hand side failed.
    Fault(TaskFault),
}

impl fmt::Display for StepperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedStages { stages } => {
                write!(f, "no coefficient table for {stages} stages (supported: 2..=8)")
            }
            Self::ShapeMismatch { expected, actual } => write!(
                f,
                "state shape {actual} does not match stepper history {expected}"
            ),
            Self::Algebra(e) => write!(f, "algebra: {e}"),
            Self::Fault(e) => write!(f, "{e}"),
        }
    }
}

impl Error for StepperError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Algebra(e) => Some(e),
            Self::Fault(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AlgebraError> for StepperError {
    fn from(e: AlgebraError) -> Self {
        Self::Algebra(e)
    }
}

impl From<TaskFault> for StepperError {
    fn from(e: TaskFault) -> Self {
        Self::Fault(e)
    }
}

impl From<KernelError> for StepperError {
    fn from(e: KernelError) -> Self {
        Self::Fault(TaskFault::Kernel(e))
    }
}
