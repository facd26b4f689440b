//! Benchmark profiles for chainflow.
//!
//! Provides pre-built [`RunConfig`] profiles and matching initial momenta:
//!
//! - [`reference_profile`]: 4096 sites in blocks of 256, 100 RKN steps
//! - [`stress_profile`]: 65536 sites in blocks of 1024, 100 RKN steps
//! - [`pab_profile`]: the reference chain stepped by 4-stage Adams–Bashforth
//! - [`initial_momenta`]: deterministic momenta via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use chainflow_core::Boundary;
use chainflow_engine::{InitialValues, Integrator, RunConfig, RunError, Simulation};

/// Reference profile: 4096 sites, 16 blocks of 256, free ends.
///
/// dt=0.01 keeps the symplectic energy error near 1e-9 for random
/// momenta in `[-1, 1)`.
pub fn reference_profile() -> RunConfig {
    RunConfig {
        chain_len: 4096,
        block_len: 256,
        steps: 100,
        dt: 0.01,
        left: Boundary::Free,
        right: Boundary::Free,
        integrator: Integrator::Rkn,
        ..RunConfig::default()
    }
}

/// Stress profile: 65536 sites, 64 blocks of 1024.
///
/// Same stepper as [`reference_profile`] at 16x the chain length.
pub fn stress_profile() -> RunConfig {
    RunConfig {
        chain_len: 65536,
        block_len: 1024,
        ..reference_profile()
    }
}

/// The reference chain integrated by the 4-stage parallel Adams–Bashforth
/// stepper with pinned ends.
pub fn pab_profile() -> RunConfig {
    RunConfig {
        integrator: Integrator::AdamsBashforth { stages: 4 },
        left: Boundary::Pinned,
        right: Boundary::Pinned,
        ..reference_profile()
    }
}

/// Deterministic momenta in `[-1, 1)` for `config.chain_len` sites.
pub fn initial_momenta(config: &RunConfig, seed: u64) -> Vec<f64> {
    chainflow_test_utils::random_momenta(config.chain_len, seed)
}

/// Build a simulation at rest in position with seeded momenta.
pub fn simulation(config: RunConfig, seed: u64) -> Result<Simulation, RunError> {
    let p0 = initial_momenta(&config, seed);
    Simulation::new(config, InitialValues::Zeros, p0)
}
