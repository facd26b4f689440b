//! Integration test: task-graph force versus the flat reference.
//!
//! The block graph must reproduce `chain_force` bit for bit for every
//! partition of a chain, every boundary configuration and both exponent
//! representations, and a block's derivative may depend only on its own
//! positions and its immediate neighbours'.

use chainflow_core::{Boundary, ChainParams, Exponent, Partition, TaskFault};
use chainflow_engine::{ChainForce, StencilGraph, SyncPolicy};
use chainflow_integrate::ForceField;
use chainflow_kernel::{chain_force, BlockKernel, PhaseChain};
use chainflow_task::{BlockState, Executor, ExecutorConfig};
use chainflow_test_utils::fixtures::{NanStencil, PanicStencil};
use chainflow_test_utils::{blocks_from_flat, flatten, uniform};
use proptest::prelude::*;

fn executor(workers: usize) -> Executor {
    Executor::new(&ExecutorConfig::with_workers(workers)).unwrap()
}

fn boundary() -> impl Strategy<Value = Boundary> {
    prop_oneof![
        Just(Boundary::Free),
        Just(Boundary::Pinned),
        (-0.5..0.5_f64).prop_map(Boundary::Coupled),
    ]
}

fn exponents() -> impl Strategy<Value = (Exponent, Exponent)> {
    prop_oneof![
        Just((Exponent::Real(3.5), Exponent::Real(4.5))),
        Just((Exponent::Integer(4), Exponent::Integer(6))),
        (1.5..6.0_f64, 1.5..6.0_f64).prop_map(|(k, l)| (Exponent::Real(k), Exponent::Real(l))),
    ]
}

fn evaluate(force: &ChainForce, q: &[f64], block_len: usize) -> Vec<f64> {
    let x = blocks_from_flat(q, block_len);
    let mut out = x.clone();
    force.force(&x, &mut out).unwrap();
    flatten(&out)
}

// ── Equivalence ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn graph_matches_reference(
        blocks in 1_usize..9,
        block_len in 1_usize..9,
        (kappa, lambda) in exponents(),
        left in boundary(),
        right in boundary(),
        seed in any::<u64>(),
    ) {
        let n = blocks * block_len;
        let params = ChainParams { kappa, lambda, left, right };
        let q = uniform(n, 1.0, seed);
        let mut expected = vec![0.0; n];
        chain_force(&params, &q, &mut expected).unwrap();

        let force = ChainForce::chain(executor(3), Partition::new(n, block_len).unwrap(), &params);
        prop_assert_eq!(evaluate(&force, &q, block_len), expected);
    }
}

#[test]
fn every_partition_of_one_chain_agrees() {
    let params = ChainParams::default();
    let q = uniform(24, 0.8, 11);
    let mut expected = vec![0.0; 24];
    chain_force(&params, &q, &mut expected).unwrap();
    let exec = executor(4);
    for g in [1, 2, 3, 4, 6, 8, 12, 24] {
        let force = ChainForce::chain(exec.clone(), Partition::new(24, g).unwrap(), &params);
        assert_eq!(evaluate(&force, &q, g), expected, "block_len={g}");
    }
}

#[test]
fn phase_chain_graph_matches_whole_chain() {
    let pc = PhaseChain::default();
    let x = uniform(20, 3.0, 5);
    let mut expected = vec![0.0; 20];
    pc.rhs(&x, &mut expected).unwrap();
    let graph = StencilGraph::new(executor(2), Partition::new(20, 5).unwrap(), pc);
    let state = blocks_from_flat(&x, 5);
    let mut out = state.clone();
    graph.evaluate(&state, &mut out).unwrap();
    assert_eq!(flatten(&out), expected);
}

// ── Locality ─────────────────────────────────────────────────────────

#[test]
fn perturbation_reaches_only_adjacent_blocks() {
    let (m, g) = (8, 4);
    let params = ChainParams::default();
    let force = ChainForce::chain(executor(2), Partition::new(m * g, g).unwrap(), &params);
    let q = uniform(m * g, 0.5, 3);
    let base = evaluate(&force, &q, g);

    for i in 0..m {
        let mut perturbed = q.clone();
        for v in &mut perturbed[i * g..(i + 1) * g] {
            *v += 0.25;
        }
        let after = evaluate(&force, &perturbed, g);
        for j in 0..m {
            let same = base[j * g..(j + 1) * g] == after[j * g..(j + 1) * g];
            if i.abs_diff(j) > 1 {
                assert!(same, "block {j} changed when block {i} moved");
            } else if i == j {
                assert!(!same, "block {i} did not change");
            }
        }
    }
}

// ── Faults ───────────────────────────────────────────────────────────

#[test]
fn nan_in_one_block_poisons_only_its_slot() {
    let kernel = NanStencil::new(BlockKernel::new(&ChainParams::default()), 1.0);
    let graph = StencilGraph::new(executor(2), Partition::new(12, 3).unwrap(), kernel);
    let mut q = uniform(12, 0.5, 9);
    q[7] = 2.0;
    let x = blocks_from_flat(&q, 3);
    let mut out = x.clone();
    graph.evaluate(&x, &mut out).unwrap();
    for i in 0..4 {
        let result = out.get(i).wait();
        if i == 2 {
            assert!(matches!(result, Err(TaskFault::Kernel(_))));
        } else {
            assert!(result.is_ok(), "block {i}");
        }
    }
}

#[test]
fn panic_in_kernel_is_a_fault_and_barrier_returns_it() {
    let kernel = PanicStencil::new(BlockKernel::new(&ChainParams::default()), 1.0);
    let graph = StencilGraph::new(executor(2), Partition::new(8, 4).unwrap(), kernel)
        .with_policy(SyncPolicy::Barrier);
    let mut q = vec![0.0; 8];
    q[5] = 3.0;
    let x = blocks_from_flat(&q, 4);
    let mut out: BlockState = x.clone();
    let err = graph.evaluate(&x, &mut out).unwrap_err();
    assert!(err.to_string().contains("crossed threshold"), "{err}");
    assert!(out.get(0).wait().is_ok());
}
