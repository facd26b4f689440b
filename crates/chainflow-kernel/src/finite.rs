//! Non-finite value detection.

use chainflow_core::{BlockId, KernelError};

/// Fail with [`KernelError::NonFinite`] at the first NaN or infinity.
pub fn check_finite(block: Option<BlockId>, values: &[f64]) -> Result<(), KernelError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(KernelError::NonFinite {
            block,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}
