//! Kernels that fault on demand.
//!
//! Both wrap a working kernel and misbehave only on blocks containing a
//! position whose magnitude exceeds `threshold`, so a test can target one
//! block by perturbing its initial positions.
//!
//! - [`NanStencil`]: writes NaN into the output.
//! - [`PanicStencil`]: panics inside the kernel.

use chainflow_core::KernelError;
use chainflow_kernel::BlockStencil;

fn triggered(x: &[f64], threshold: f64) -> bool {
    x.iter().any(|v| v.abs() > threshold)
}

/// Produces NaN at index 0 of any block that crosses the threshold.
#[derive(Clone, Debug)]
pub struct NanStencil<K> {
    pub inner: K,
    pub threshold: f64,
}

impl<K> NanStencil<K> {
    pub fn new(inner: K, threshold: f64) -> Self {
        Self { inner, threshold }
    }
}

impl<K: BlockStencil> BlockStencil for NanStencil<K> {
    fn apply(
        &self,
        x: &[f64],
        left: Option<f64>,
        right: Option<f64>,
        out: &mut [f64],
    ) -> Result<(), KernelError> {
        self.inner.apply(x, left, right, out)?;
        if triggered(x, self.threshold) {
            out[0] = f64::NAN;
        }
        Ok(())
    }
}

/// Panics in any block that crosses the threshold.
#[derive(Clone, Debug)]
pub struct PanicStencil<K> {
    pub inner: K,
    pub threshold: f64,
}

impl<K> PanicStencil<K> {
    pub fn new(inner: K, threshold: f64) -> Self {
        Self { inner, threshold }
    }
}

impl<K: BlockStencil> BlockStencil for PanicStencil<K> {
    fn apply(
        &self,
        x: &[f64],
        left: Option<f64>,
        right: Option<f64>,
        out: &mut [f64],
    ) -> Result<(), KernelError> {
        if triggered(x, self.threshold) {
            panic!("block crossed threshold {}", self.threshold);
        }
        self.inner.apply(x, left, right, out)
    }
}
