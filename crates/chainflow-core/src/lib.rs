//! Core types for the chainflow oscillator-chain integrator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other chainflow crate: block and generation
//! identifiers, the exponent representation and its `signed_pow` rule,
//! chain boundary conditions, chain parameters, partition geometry, and
//! the error types for configuration, kernel and task failures.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod chain;
pub mod error;
pub mod exponent;
pub mod id;
pub mod partition;

pub use boundary::Boundary;
pub use chain::ChainParams;
pub use error::{ConfigError, KernelError, TaskFault};
pub use exponent::{abs_pow, signed_pow, Exponent};
pub use id::{BlockId, Generation};
pub use partition::Partition;

/// One block's worth of oscillator values (positions, momenta or forces).
pub type Block = Vec<f64>;
