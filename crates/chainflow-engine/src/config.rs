//! Run configuration and validation.
//!
//! [`RunConfig`] is the single input to [`Simulation::new`](crate::Simulation::new).
//! [`validate()`](RunConfig::validate) checks every structural invariant up
//! front; nothing is scheduled for a configuration that fails it.

use chainflow_core::{Boundary, ChainParams, ConfigError, Exponent, Partition};
use chainflow_integrate::PabTableau;
use chainflow_task::ExecutorConfig;

// ── Integrator ─────────────────────────────────────────────────────

/// Which stepper advances the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Integrator {
    /// Symplectic Runge–Kutta–Nyström, 6 stages, order 4.
    #[default]
    Rkn,
    /// Parallel Adams–Bashforth with the given stage count (2..=8).
    AdamsBashforth {
        /// Number of stages, which is also the order.
        stages: usize,
    },
}

// ── SyncPolicy ─────────────────────────────────────────────────────

/// Whether a force evaluation waits for its result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Return as soon as the block nodes are scheduled.
    #[default]
    Lazy,
    /// Wait for every block derivative before returning; a fault is
    /// reported by the evaluation that produced it.
    Barrier,
}

// ── RunConfig ──────────────────────────────────────────────────────

/// Everything needed to set up a run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Number of oscillators N. Default: 1024.
    pub chain_len: usize,
    /// Oscillators per block G; must divide `chain_len`. Default: 64.
    pub block_len: usize,
    /// Steps per trial. Default: 100.
    pub steps: usize,
    /// Time step. Default: 0.01.
    pub dt: f64,
    /// On-site exponent κ. Default: 3.5.
    pub kappa: Exponent,
    /// Coupling exponent λ. Default: 4.5.
    pub lambda: Exponent,
    /// Left chain end. Default: pinned.
    pub left: Boundary,
    /// Right chain end. Default: pinned.
    pub right: Boundary,
    /// Stepper selection. Default: RKN.
    pub integrator: Integrator,
    /// Force-evaluation synchronization. Default: lazy.
    pub sync: SyncPolicy,
    /// Worker threads. `None` = `available_parallelism`.
    pub worker_count: Option<usize>,
    /// Reject non-finite kernel output. Default: on.
    pub check_finite: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let params = ChainParams::default();
        Self {
            chain_len: 1024,
            block_len: 64,
            steps: 100,
            dt: 0.01,
            kappa: params.kappa,
            lambda: params.lambda,
            left: params.left,
            right: params.right,
            integrator: Integrator::default(),
            sync: SyncPolicy::default(),
            worker_count: None,
            check_finite: true,
        }
    }
}

impl RunConfig {
    /// Check every structural invariant.
    ///
    /// Rejects a block length that does not divide the chain, zero chain,
    /// block or step counts, a non-finite or non-positive `dt`, unusable
    /// exponents, non-finite `Coupled` anchors and stage counts without a
    /// coefficient table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.partition()?;
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep { value: self.dt });
        }
        self.chain_params().validate()?;
        if let Integrator::AdamsBashforth { stages } = self.integrator {
            if !(PabTableau::MIN_STAGES..=PabTableau::MAX_STAGES).contains(&stages) {
                return Err(ConfigError::UnsupportedStages { stages });
            }
        }
        Ok(())
    }

    /// Block geometry of the chain.
    pub fn partition(&self) -> Result<Partition, ConfigError> {
        Partition::new(self.chain_len, self.block_len)
    }

    /// Physical parameters of the chain.
    pub fn chain_params(&self) -> ChainParams {
        ChainParams {
            kappa: self.kappa,
            lambda: self.lambda,
            left: self.left,
            right: self.right,
        }
    }

    /// Worker-pool configuration.
    pub fn executor_config(&self) -> ExecutorConfig {
        ExecutorConfig {
            worker_count: self.worker_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let c = RunConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.partition().unwrap().block_count(), 16);
        assert_eq!(c.chain_params(), ChainParams::default());
    }

    #[test]
    fn rejects_indivisible_chain() {
        let c = RunConfig {
            chain_len: 100,
            block_len: 7,
            ..RunConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::IndivisibleChain {
                chain_len: 100,
                block_len: 7
            })
        );
    }

    #[test]
    fn rejects_zero_sizes() {
        for (chain_len, block_len) in [(0, 4), (8, 0)] {
            let c = RunConfig {
                chain_len,
                block_len,
                ..RunConfig::default()
            };
            assert!(matches!(
                c.validate(),
                Err(ConfigError::EmptyPartition { .. })
            ));
        }
        let c = RunConfig {
            steps: 0,
            ..RunConfig::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroSteps));
    }

    #[test]
    fn rejects_bad_time_step() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let c = RunConfig {
                dt,
                ..RunConfig::default()
            };
            assert!(
                matches!(c.validate(), Err(ConfigError::InvalidTimeStep { .. })),
                "dt = {dt}"
            );
        }
    }

    #[test]
    fn rejects_bad_exponents_and_anchors() {
        let c = RunConfig {
            kappa: Exponent::Real(f64::NAN),
            ..RunConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidExponent { name: "kappa", .. })
        ));
        let c = RunConfig {
            lambda: Exponent::Integer(0),
            ..RunConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidExponent { name: "lambda", .. })
        ));
        let c = RunConfig {
            left: Boundary::Coupled(f64::NAN),
            ..RunConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidBoundary { end: "left", .. })
        ));
    }

    #[test]
    fn stage_counts() {
        for stages in 2..=8 {
            let c = RunConfig {
                integrator: Integrator::AdamsBashforth { stages },
                ..RunConfig::default()
            };
            assert!(c.validate().is_ok());
        }
        for stages in [0, 1, 9] {
            let c = RunConfig {
                integrator: Integrator::AdamsBashforth { stages },
                ..RunConfig::default()
            };
            assert_eq!(c.validate(), Err(ConfigError::UnsupportedStages { stages }));
        }
    }

    #[test]
    fn executor_config_carries_worker_count() {
        let c = RunConfig {
            worker_count: Some(3),
            ..RunConfig::default()
        };
        assert_eq!(c.executor_config().resolved_worker_count(), 3);
    }
}
