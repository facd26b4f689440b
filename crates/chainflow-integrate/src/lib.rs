//! State algebra and time steppers for chainflow.
//!
//! Steppers are written once against two seams:
//!
//! - [`Algebra`]: elementwise linear combinations of states
//!   ([`ScaleSum`]), with a synchronous [`FlatAlgebra`] over `Vec<f64>`
//!   and a [`DataflowAlgebra`] that chains one async node per block over
//!   a partitioned [`BlockState`](chainflow_task::BlockState).
//! - [`ForceField`] / [`FirstOrderSystem`]: the right-hand side.
//!
//! The same stepper code therefore runs unchanged on flat vectors and on
//! partitioned, asynchronously produced state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod algebra;
pub mod error;
pub mod ops;
pub mod stepper;
pub mod system;

pub use algebra::{Algebra, DataflowAlgebra, FlatAlgebra};
pub use error::{AlgebraError, StepperError};
pub use ops::ScaleSum;
pub use stepper::{
    integrate_hamiltonian_n_steps, integrate_n_steps, FirstOrderStepper, HamiltonianStepper,
    ParallelAdamsBashforth, PabTableau, RungeKutta4, SymplecticRkn,
};
pub use system::{FirstOrderSystem, ForceField, Phase, PhaseSpace};
