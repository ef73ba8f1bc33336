//! Benchmarks for the reordering engine
//!
//! Run with: cargo bench -p qwarp-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qwarp_compile::passes::{CommutationRule, ReorderConfig, reorder};
use qwarp_ir::{Circuit, QubitId};

/// A brickwork of CZs followed by the same brickwork in reverse, which
/// gives the insertion sort plenty to move.
fn brickwork(num_qubits: u32, layers: u32) -> Circuit {
    let mut circuit = Circuit::with_size("brickwork", num_qubits);
    for layer in 0..layers {
        let mut q = layer % 2;
        while q + 1 < num_qubits {
            circuit.cz(QubitId(q + 1), QubitId(q)).unwrap();
            q += 2;
        }
        circuit.h(QubitId(layer % num_qubits)).unwrap();
    }
    let reversed = circuit.instructions().iter().rev().cloned().collect::<Vec<_>>();
    Circuit::from_instructions("brickwork", num_qubits, reversed).unwrap()
}

/// Mask path vs set path on the same circuits
fn bench_oracle_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("reorder_oracle");

    for num_qubits in &[8u32, 32, 64] {
        let circuit = brickwork(*num_qubits, 20);
        for (label, threshold) in [("mask", 64usize), ("set", 0)] {
            let config = ReorderConfig::default().with_mask_threshold(threshold);
            group.bench_with_input(BenchmarkId::new(label, num_qubits), &circuit, |b, circuit| {
                b.iter(|| reorder(black_box(circuit), &config).unwrap());
            });
        }
    }

    group.finish();
}

/// Cost of numerical commutation checks
fn bench_unitary_rule(c: &mut Criterion) {
    let circuit = brickwork(8, 20);
    let config = ReorderConfig::default().with_commutation(CommutationRule::Unitary);
    c.bench_function("reorder_unitary_rule_8q", |b| {
        b.iter(|| reorder(black_box(&circuit), &config).unwrap());
    });
}

criterion_group!(benches, bench_oracle_paths, bench_unitary_rule);
criterion_main!(benches);
