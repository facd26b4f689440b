//! Chainflow: a block-partitioned dataflow integrator for nonlinear
//! oscillator chains.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! chainflow sub-crates. For most users, adding `chainflow` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use chainflow::prelude::*;
//!
//! let config = RunConfig {
//!     chain_len: 64,
//!     block_len: 16,
//!     steps: 10,
//!     left: Boundary::Free,
//!     right: Boundary::Free,
//!     worker_count: Some(2),
//!     ..RunConfig::default()
//! };
//! let p0: Vec<f64> = (0..64).map(|i| (i as f64 * 0.3).sin()).collect();
//! let mut sim = Simulation::new(config, InitialValues::Zeros, p0).unwrap();
//! let metrics = sim.run_trials(1).unwrap();
//! assert_eq!(metrics.trial_us.len(), 1);
//! assert!(metrics.relative_drift() < 1e-6);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `chainflow-core` | IDs, exponents, boundaries, chain parameters, errors |
//! | [`task`] | `chainflow-task` | Write-once slots, worker pool, dataflow nodes, partitioned state |
//! | [`kernel`] | `chainflow-kernel` | Block force kernels, energy, phase-chain kernel |
//! | [`integrate`] | `chainflow-integrate` | Algebras and steppers (RKN, Adams–Bashforth, RK4) |
//! | [`engine`] | `chainflow-engine` | Task-graph force, run configuration, simulation driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types (`chainflow-core`).
///
/// Contains [`types::Exponent`], [`types::Boundary`], [`types::ChainParams`],
/// [`types::Partition`] and the shared error types.
pub use chainflow_core as types;

/// Asynchronous slots and the worker pool (`chainflow-task`).
///
/// [`task::Slot`] is the write-once cell every block value lives in;
/// [`task::Executor`] runs the nodes that fill them.
pub use chainflow_task as task;

/// Force kernels and diagnostics (`chainflow-kernel`).
pub use chainflow_kernel as kernel;

/// State algebras and time steppers (`chainflow-integrate`).
///
/// The same [`integrate::SymplecticRkn`] runs over
/// [`integrate::FlatAlgebra`] and [`integrate::DataflowAlgebra`].
pub use chainflow_integrate as integrate;

/// Task-graph force and simulation driver (`chainflow-engine`).
pub use chainflow_engine as engine;

/// Common imports for typical chainflow usage.
///
/// ```rust
/// use chainflow::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use chainflow_core::{BlockId, Boundary, ChainParams, Exponent, Partition};

    // Errors
    pub use chainflow_core::{ConfigError, KernelError, TaskFault};
    pub use chainflow_engine::RunError;
    pub use chainflow_integrate::{AlgebraError, StepperError};

    // Tasks
    pub use chainflow_task::{BlockState, Executor, ExecutorConfig, Slot};

    // Kernels
    pub use chainflow_kernel::{chain_force, energy, BlockKernel, BlockStencil, PhaseChain};

    // Steppers
    pub use chainflow_integrate::{
        Algebra, DataflowAlgebra, FirstOrderStepper, FlatAlgebra, HamiltonianStepper,
        ParallelAdamsBashforth, Phase, PhaseSpace, RungeKutta4, SymplecticRkn,
    };

    // Engine
    pub use chainflow_engine::{
        ChainForce, FlatChainForce, InitialValues, Integrator, RunConfig, RunMetrics, Simulation,
        SyncPolicy,
    };
}
