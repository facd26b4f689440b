//! Timing and conservation metrics for a set of trials.
//!
//! [`RunMetrics`] is filled by [`Simulation::run_trials`](crate::Simulation::run_trials).

/// Wall-clock durations and energy drift collected over repeated trials.
///
/// Durations are in microseconds and cover scheduling plus the final wait
/// for every slot of the state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunMetrics {
    /// Steps taken per trial.
    pub steps: u64,
    /// Wall-clock time of each trial, in microseconds.
    pub trial_us: Vec<u64>,
    /// Energy of the initial state.
    pub energy_initial: f64,
    /// Energy after the last trial.
    pub energy_final: f64,
}

impl RunMetrics {
    /// Fastest trial, in microseconds.
    pub fn min(&self) -> Option<u64> {
        self.trial_us.iter().copied().min()
    }

    /// Mean trial time, in microseconds.
    pub fn mean(&self) -> Option<f64> {
        if self.trial_us.is_empty() {
            return None;
        }
        let total: u64 = self.trial_us.iter().sum();
        Some(total as f64 / self.trial_us.len() as f64)
    }

    /// `|E_final − E_initial| / |E_initial|`, or the absolute drift when
    /// the initial energy is zero.
    pub fn relative_drift(&self) -> f64 {
        let drift = (self.energy_final - self.energy_initial).abs();
        if self.energy_initial == 0.0 {
            drift
        } else {
            drift / self.energy_initial.abs()
        }
    }
}
