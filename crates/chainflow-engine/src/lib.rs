//! Task-graph force evaluation and run driver for chainflow.
//!
//! [`ChainForce`] turns one force evaluation into a graph of per-block
//! dataflow nodes over partitioned state. [`Simulation`] wires it to a
//! stepper from `chainflow-integrate` according to a validated
//! [`RunConfig`], and reports [`RunMetrics`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod flat;
pub mod graph;
pub mod init;
pub mod metrics;
pub mod sim;

pub use config::{Integrator, RunConfig, SyncPolicy};
pub use error::RunError;
pub use flat::FlatChainForce;
pub use graph::{ChainForce, StencilGraph};
pub use init::{copy_block, energy_of_blocks, init_state, zero_block, InitialValues};
pub use metrics::RunMetrics;
pub use sim::Simulation;
