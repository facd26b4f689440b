//! Errors surfaced by a run.

use std::error::Error;
use std::fmt;

use chainflow_core::{ConfigError, TaskFault};
use chainflow_integrate::{AlgebraError, StepperError};

/// Why a run could not start or did not finish.
#[derive(Clone, Debug, PartialEq)]
pub enum RunError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// The stepper rejected a step before scheduling it.
    Stepper(StepperError),
    /// A task in the graph faulted; the run stops with no partial result.
    Aborted {
        /// Number of steps scheduled, including the failing one, when the
        /// fault was observed.
        step: u64,
        /// The original fault.
        fault: TaskFault,
    },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Stepper(e) => write!(f, "stepper: {e}"),
            Self::Aborted { step, fault } => write!(f, "run aborted at step {step}: {fault}"),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Stepper(e) => Some(e),
            Self::Aborted { fault, .. } => Some(fault),
        }
    }
}

impl From<ConfigError> for RunError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl RunError {
    /// Classify a stepper error raised while taking step `step`: task
    /// faults abort the run, anything else is a stepper error.
    pub fn from_step(step: u64, e: StepperError) -> Self {
        match e {
            StepperError::Fault(fault) | StepperError::Algebra(AlgebraError::Fault(fault)) => {
                Self::Aborted { step, fault }
            }
            other => Self::Stepper(other),
        }
    }
}
