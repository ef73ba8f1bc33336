//! Random Pauli insertion before two-qubit gates.
//!
//! Used for noise amplification: a Pauli pair sampled from a 4x4 table over
//! `{I, X, Y, Z}²` is placed in front of every target occurrence. Unlike a
//! gauge this changes what the circuit computes.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use tracing::debug;

use qwarp_ir::{Circuit, Instruction, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::gauge::TargetMatcher;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

const PAULIS: [StandardGate; 4] = [StandardGate::I, StandardGate::X, StandardGate::Y, StandardGate::Z];

/// Inserts a sampled Pauli pair before each target gate.
#[derive(Debug, Clone)]
pub struct PauliInsertion {
    target: TargetMatcher,
    probabilities: [[f64; 4]; 4],
    index: WeightedIndex<f64>,
}

impl PauliInsertion {
    /// Create the pass.
    ///
    /// `probabilities[i][j]` is the chance of inserting `PAULIS[i]` on the
    /// first operand and `PAULIS[j]` on the second, in `I, X, Y, Z` order.
    /// `None` means uniform.
    pub fn new(
        target: impl Into<TargetMatcher>,
        probabilities: Option<[[f64; 4]; 4]>,
    ) -> CompileResult<Self> {
        let probabilities = probabilities.unwrap_or([[1.0 / 16.0; 4]; 4]);
        let flat: Vec<f64> = probabilities.iter().flatten().copied().collect();
        if flat.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(CompileError::InvalidDistribution(
                "Pauli probabilities must be non-negative".into(),
            ));
        }
        let sum: f64 = flat.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            return Err(CompileError::InvalidDistribution(format!(
                "Pauli probabilities sum to {sum}, expected 1"
            )));
        }
        let index =
            WeightedIndex::new(&flat).map_err(|e| CompileError::InvalidDistribution(e.to_string()))?;
        Ok(Self {
            target: target.into(),
            probabilities,
            index,
        })
    }

    /// The sampling table.
    pub fn probabilities(&self) -> &[[f64; 4]; 4] {
        &self.probabilities
    }

    /// Insert Paulis into `circuit`.
    pub fn apply<R: Rng + ?Sized>(&self, circuit: &Circuit, rng: &mut R) -> CompileResult<Circuit> {
        let mut out = circuit.empty_like();
        let mut inserted = 0usize;
        for inst in circuit {
            if self.target.matches(&inst.gate) {
                let &[q0, q1] = inst.qubits.as_slice() else {
                    return Err(CompileError::ArityMismatch {
                        gate_name: inst.name().to_string(),
                        got: inst.qubits.len(),
                    });
                };
                let pair = self.index.sample(rng);
                out.push(Instruction::single_qubit_gate(PAULIS[pair / 4].clone(), q0))?;
                out.push(Instruction::single_qubit_gate(PAULIS[pair % 4].clone(), q1))?;
                inserted += 1;
            }
            out.push(inst.clone())?;
        }
        debug!("Inserted Pauli pairs before {} gates", inserted);
        Ok(out)
    }
}

impl Pass for PauliInsertion {
    fn name(&self) -> &'static str {
        "PauliInsertion"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let mut rng = properties.rng(self.name());
        self.apply(circuit, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwarp_ir::{Gate, QubitId};
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};

    fn cz_chain(n: usize) -> Circuit {
        let mut c = Circuit::with_size("chain", 2);
        for _ in 0..n {
            c.cz(QubitId(0), QubitId(1)).unwrap();
        }
        c
    }

    #[test]
    fn test_inserts_one_pair_per_target() {
        let pass = PauliInsertion::new(Gate::standard(StandardGate::CZ), None).unwrap();
        let mut circuit = cz_chain(3);
        circuit.h(QubitId(0)).unwrap();
        let out = pass.apply(&circuit, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(out.len(), 3 * 3 + 1);
        assert_eq!(out.instructions()[2].name(), "cz");
        assert_eq!(out.instructions()[0].qubits, vec![QubitId(0)]);
        assert_eq!(out.instructions()[1].qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_deterministic_table() {
        let mut table = [[0.0; 4]; 4];
        table[1][3] = 1.0;
        let pass = PauliInsertion::new(Gate::standard(StandardGate::CZ), Some(table)).unwrap();
        let out = pass.apply(&cz_chain(1), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(out.instructions()[0].name(), "x");
        assert_eq!(out.instructions()[1].name(), "z");
    }

    #[test]
    fn test_frequencies_follow_table() {
        let mut table = [[0.0; 4]; 4];
        table[0][0] = 0.5;
        table[2][2] = 0.5;
        let pass = PauliInsertion::new(Gate::standard(StandardGate::CZ), Some(table)).unwrap();
        let out = pass.apply(&cz_chain(4000), &mut StdRng::seed_from_u64(9)).unwrap();
        let counts = out.count_ops();
        let yy = counts.get("y").copied().unwrap_or(0) as f64 / 2.0;
        assert!((yy / 4000.0 - 0.5).abs() < 0.03);
        assert!(counts.get("x").is_none());
    }

    #[test]
    fn test_one_draw_per_occurrence() {
        let pass = PauliInsertion::new(Gate::standard(StandardGate::CZ), None).unwrap();
        let mut circuit = cz_chain(6);
        circuit.h(QubitId(1)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let mut rng = StdRng::seed_from_u64(8);
        let mut twin = StdRng::seed_from_u64(8);
        pass.apply(&circuit, &mut rng).unwrap();
        for _ in 0..6 {
            pass.index.sample(&mut twin);
        }
        assert_eq!(rng.next_u64(), twin.next_u64());
    }

    #[test]
    fn test_rejects_bad_table() {
        let cz = Gate::standard(StandardGate::CZ);
        assert!(PauliInsertion::new(cz.clone(), Some([[0.1; 4]; 4])).is_err());
        let mut negative = [[1.0 / 16.0; 4]; 4];
        negative[0][0] = -1.0 / 16.0;
        negative[0][1] = 3.0 / 16.0;
        assert!(PauliInsertion::new(cz, Some(negative)).is_err());
    }
}
