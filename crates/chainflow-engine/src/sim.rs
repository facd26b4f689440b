//! Run driver.
//!
//! A [`Simulation`] owns the worker pool, the task-graph force, the
//! selected stepper and the partitioned state. Steps only schedule work;
//! [`sync`](Simulation::sync) (and everything that reads the state) waits
//! for it and turns a poisoned slot into [`RunError::Aborted`].

use std::time::Instant;

use chainflow_core::{ChainParams, TaskFault};
use chainflow_integrate::{
    DataflowAlgebra, FirstOrderStepper, HamiltonianStepper, ParallelAdamsBashforth, Phase,
    PhaseSpace, SymplecticRkn,
};
use chainflow_task::{BlockState, Executor};
use tracing::{debug, info, warn};

use crate::config::{Integrator, RunConfig};
use crate::error::RunError;
use crate::graph::ChainForce;
use crate::init::{energy_of_blocks, init_state, InitialValues};
use crate::metrics::RunMetrics;

enum Stepper {
    Rkn(SymplecticRkn<BlockState, DataflowAlgebra>),
    Pab(ParallelAdamsBashforth<Phase<BlockState>, DataflowAlgebra>),
}

impl Stepper {
    fn reset(&mut self) {
        match self {
            Self::Rkn(st) => st.reset(),
            Self::Pab(st) => st.reset(),
        }
    }
}

/// An oscillator chain integrated on a worker pool.
pub struct Simulation {
    config: RunConfig,
    params: ChainParams,
    executor: Executor,
    force: ChainForce,
    stepper: Stepper,
    initial: Phase<BlockState>,
    state: Phase<BlockState>,
    steps_taken: u64,
}

impl Simulation {
    /// Validate `config`, start the pool and schedule the initial state.
    pub fn new(
        config: RunConfig,
        q0: impl Into<InitialValues>,
        p0: impl Into<InitialValues>,
    ) -> Result<Self, RunError> {
        config.validate()?;
        let partition = config.partition()?;
        let params = config.chain_params();
        let executor = Executor::new(&config.executor_config())?;
        let force = ChainForce::chain(executor.clone(), partition, &params)
            .with_policy(config.sync)
            .with_finite_check(config.check_finite);
        let algebra = DataflowAlgebra::new(executor.clone());
        let stepper = match config.integrator {
            Integrator::Rkn => Stepper::Rkn(SymplecticRkn::new(algebra)),
            Integrator::AdamsBashforth { stages } => Stepper::Pab(
                ParallelAdamsBashforth::new(algebra, stages).map_err(RunError::Stepper)?,
            ),
        };
        let initial = init_state(&executor, &partition, &q0.into(), &p0.into())?;
        info!(
            chain_len = partition.chain_len(),
            block_len = partition.block_len(),
            blocks = partition.block_count(),
            workers = executor.worker_count(),
            integrator = ?config.integrator,
            sync = ?config.sync,
            "simulation ready"
        );
        Ok(Self {
            config,
            params,
            executor,
            force,
            stepper,
            state: initial.clone(),
            initial,
            steps_taken: 0,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The worker pool.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Steps scheduled since construction or the last [`reset`](Self::reset).
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Current (possibly unresolved) state.
    pub fn state(&self) -> &Phase<BlockState> {
        &self.state
    }

    /// Schedule one step of size `config.dt`.
    ///
    /// Under the lazy policy this returns before the step is computed and
    /// task faults are reported by the next wait. Under the barrier policy
    /// a fault in this step's force evaluations is returned here.
    pub fn step(&mut self) -> Result<(), RunError> {
        let dt = self.config.dt;
        let result = match &mut self.stepper {
            Stepper::Rkn(st) => st.do_step(&self.force, &mut self.state.q, &mut self.state.p, dt),
            Stepper::Pab(st) => st.do_step(&PhaseSpace::new(&self.force), &mut self.state, dt),
        };
        if let Err(e) = result {
            let e = RunError::from_step(self.steps_taken + 1, e);
            warn!(error = %e, "step failed");
            return Err(e);
        }
        self.steps_taken += 1;
        debug!(step = self.steps_taken, "step scheduled");
        Ok(())
    }

    /// Wait until every slot of the state resolves.
    pub fn sync(&self) -> Result<(), RunError> {
        self.state.q.wait_all().map_err(|f| self.abort(f))?;
        self.state.p.wait_all().map_err(|f| self.abort(f))?;
        Ok(())
    }

    /// Take `config.steps` steps and wait for the result.
    ///
    /// Returns the wall-clock time in microseconds.
    pub fn run(&mut self) -> Result<u64, RunError> {
        let start = Instant::now();
        for _ in 0..self.config.steps {
            self.step()?;
        }
        self.sync()?;
        Ok(u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX))
    }

    /// Return to the initial state and discard stepper history.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.stepper.reset();
        self.steps_taken = 0;
    }

    /// Run `trials` times from the initial state, timing each run.
    pub fn run_trials(&mut self, trials: usize) -> Result<RunMetrics, RunError> {
        let energy_initial = energy_of_blocks(&self.params, &self.initial.q, &self.initial.p)
            .map_err(|f| self.abort(f))?;
        info!(trials, steps = self.config.steps, energy = energy_initial, "starting trials");
        let mut metrics = RunMetrics {
            steps: self.config.steps as u64,
            trial_us: Vec::with_capacity(trials),
            energy_initial,
            energy_final: energy_initial,
        };
        for trial in 0..trials {
            self.reset();
            let us = self.run()?;
            debug!(trial, us, "trial finished");
            metrics.trial_us.push(us);
        }
        if trials > 0 {
            metrics.energy_final = self.energy()?;
        }
        info!(
            min_us = ?metrics.min(),
            mean_us = ?metrics.mean(),
            energy = metrics.energy_final,
            drift = metrics.relative_drift(),
            "trials finished"
        );
        Ok(metrics)
    }

    /// Total energy of the current state. Waits for every slot.
    pub fn energy(&self) -> Result<f64, RunError> {
        energy_of_blocks(&self.params, &self.state.q, &self.state.p).map_err(|f| self.abort(f))
    }

    /// Current positions, concatenated. Waits for every slot.
    pub fn positions(&self) -> Result<Vec<f64>, RunError> {
        self.state.q.flatten().map_err(|f| self.abort(f))
    }

    /// Current momenta, concatenated. Waits for every slot.
    pub fn momenta(&self) -> Result<Vec<f64>, RunError> {
        self.state.p.flatten().map_err(|f| self.abort(f))
    }

    fn abort(&self, fault: TaskFault) -> RunError {
        warn!(step = self.steps_taken, %fault, "run aborted");
        RunError::Aborted {
            step: self.steps_taken,
            fault,
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("executor", &self.executor)
            .field("steps_taken", &self.steps_taken)
            .finish()
    }
}
