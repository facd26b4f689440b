//! Initial partitioned state and the blocking energy diagnostic.

use std::sync::Arc;

use chainflow_core::{Block, ChainParams, ConfigError, Partition, TaskFault};
use chainflow_integrate::Phase;
use chainflow_kernel::energy;
use chainflow_task::{BlockState, Executor};

/// A zero-filled block.
pub fn zero_block(len: usize) -> Block {
    vec![0.0; len]
}

/// `source[offset..offset + len]` as a new block.
///
/// # Panics
///
/// Panics if the range lies outside `source`.
pub fn copy_block(source: &[f64], offset: usize, len: usize) -> Block {
    source[offset..offset + len].to_vec()
}

/// Where initial positions or momenta come from.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialValues {
    /// All zero.
    Zeros,
    /// One value per oscillator.
    Values(Arc<[f64]>),
}

impl From<Vec<f64>> for InitialValues {
    fn from(v: Vec<f64>) -> Self {
        Self::Values(v.into())
    }
}

impl From<&[f64]> for InitialValues {
    fn from(v: &[f64]) -> Self {
        Self::Values(v.into())
    }
}

impl InitialValues {
    fn check(&self, partition: &Partition) -> Result<(), ConfigError> {
        match self {
            Self::Values(v) if v.len() != partition.chain_len() => {
                Err(ConfigError::ShapeMismatch {
                    expected: partition.chain_len(),
                    actual: v.len(),
                })
            }
            _ => Ok(()),
        }
    }

    fn spawn(&self, executor: &Executor, partition: &Partition) -> BlockState {
        let len = partition.block_len();
        let slots = partition
            .blocks()
            .map(|b| {
                let offset = partition.range(b).start;
                let source = self.clone();
                executor.async_task(move || {
                    Ok(match &source {
                        Self::Zeros => zero_block(len),
                        Self::Values(v) => copy_block(v, offset, len),
                    })
                })
            })
            .collect();
        BlockState::new(slots)
    }
}

/// Partitioned positions and momenta, one pool task per block and field.
///
/// Fails with [`ConfigError::ShapeMismatch`] if a value source does not
/// have one entry per oscillator.
pub fn init_state(
    executor: &Executor,
    partition: &Partition,
    q_source: &InitialValues,
    p_source: &InitialValues,
) -> Result<Phase<BlockState>, ConfigError> {
    q_source.check(partition)?;
    p_source.check(partition)?;
    Ok(Phase::new(
        q_source.spawn(executor, partition),
        p_source.spawn(executor, partition),
    ))
}

/// Total energy of a partitioned state.
///
/// Waits for every slot of both fields and returns the first fault.
pub fn energy_of_blocks(
    params: &ChainParams,
    q: &BlockState,
    p: &BlockState,
) -> Result<f64, TaskFault> {
    let q = q.flatten()?;
    let p = p.flatten()?;
    Ok(energy(params, &q, &p)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainflow_task::ExecutorConfig;

    fn executor() -> Executor {
        Executor::new(&ExecutorConfig::with_workers(2)).unwrap()
    }

    #[test]
    fn block_helpers() {
        assert_eq!(zero_block(3), vec![0.0; 3]);
        assert_eq!(copy_block(&[1.0, 2.0, 3.0, 4.0], 1, 2), vec![2.0, 3.0]);
    }

    #[test]
    fn init_state_partitions_values() {
        let exec = executor();
        let part = Partition::new(6, 2).unwrap();
        let q: Vec<f64> = (0..6).map(f64::from).collect();
        let state = init_state(&exec, &part, &q.clone().into(), &InitialValues::Zeros).unwrap();
        assert_eq!(state.q.len(), 3);
        assert_eq!(*state.q.get(1).wait().unwrap(), vec![2.0, 3.0]);
        assert_eq!(state.q.flatten().unwrap(), q);
        assert_eq!(state.p.flatten().unwrap(), vec![0.0; 6]);
    }

    #[test]
    fn init_state_rejects_wrong_length() {
        let exec = executor();
        let part = Partition::new(6, 3).unwrap();
        let short = InitialValues::from(vec![0.0; 5]);
        assert_eq!(
            init_state(&exec, &part, &InitialValues::Zeros, &short).unwrap_err(),
            ConfigError::ShapeMismatch {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn energy_of_blocks_matches_flat() {
        let q = BlockState::from_values([vec![0.0, 0.0], vec![0.0, 0.0]]);
        let p = BlockState::from_values([vec![1.0, -2.0], vec![0.5, 3.0]]);
        let e = energy_of_blocks(&ChainParams::default(), &q, &p).unwrap();
        assert!((e - 7.125).abs() < 1e-12);
    }

    #[test]
    fn energy_of_blocks_reports_fault() {
        let q = BlockState::new(vec![chainflow_task::Slot::poisoned(TaskFault::Abandoned)]);
        let p = BlockState::from_values([vec![0.0]]);
        assert_eq!(
            energy_of_blocks(&ChainParams::default(), &q, &p),
            Err(TaskFault::Abandoned)
        );
    }
}
