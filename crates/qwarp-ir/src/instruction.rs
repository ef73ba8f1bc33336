//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::qubit::QubitId;
use crate::unitary::Unitary;

/// A gate applied to an ordered list of qubits.
///
/// Operand order is significant: for asymmetric gates the first operand is
/// the control (or "first" qubit) and the most significant bit of the
/// gate's matrix index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate.
    pub gate: Gate,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            gate: gate.into(),
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// The operands, in order.
    pub fn operands(&self) -> &[QubitId] {
        &self.qubits
    }

    /// The unitary action on the operand space.
    pub fn matrix(&self) -> Unitary {
        self.gate.matrix()
    }

    /// Sorted operand indices, used as a canonical ordering key.
    pub fn sorted_operand_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.qubits.iter().map(|q| q.index()).collect();
        indices.sort_unstable();
        indices
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// Number of operands.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert_eq!(inst.num_qubits(), 1);
        assert_eq!(inst.name(), "h");
        assert_eq!(inst.matrix().dim(), 2);
    }

    #[test]
    fn test_structural_equality() {
        let a = Instruction::two_qubit_gate(StandardGate::CZ, QubitId(2), QubitId(1));
        let b = Instruction::two_qubit_gate(StandardGate::CZ, QubitId(2), QubitId(1));
        let c = Instruction::two_qubit_gate(StandardGate::CZ, QubitId(1), QubitId(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.sorted_operand_indices(), c.sorted_operand_indices());
    }

    #[test]
    fn test_operands_keep_order() {
        let inst = Instruction::two_qubit_gate(StandardGate::CX, QubitId(3), QubitId(0));
        assert_eq!(inst.operands(), &[QubitId(3), QubitId(0)]);
        assert_eq!(inst.sorted_operand_indices(), vec![0, 3]);
    }
}
