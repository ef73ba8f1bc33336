//! High-level circuit builder API.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::instruction::Instruction;
use crate::qubit::QubitId;
use crate::statevector::Statevector;
use crate::unitary::Unitary;

/// Widest circuit [`Circuit::unitary`] will build densely.
pub const MAX_UNITARY_QUBITS: u32 = 12;

/// Widest circuit [`Circuit::simulate`] will run on a dense statevector.
pub const MAX_SIMULATION_QUBITS: u32 = 24;

/// A quantum circuit.
///
/// A circuit is an ordered list of instructions over a fixed universe of
/// qubits `0..num_qubits`. Every instruction is validated against that
/// universe when it is added, so passes can rely on operands being in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CircuitData")]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Size of the qubit universe.
    num_qubits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

/// Unvalidated wire form of a [`Circuit`].
#[derive(Deserialize)]
struct CircuitData {
    name: String,
    num_qubits: u32,
    #[serde(default)]
    instructions: Vec<Instruction>,
}

impl TryFrom<CircuitData> for Circuit {
    type Error = IrError;

    fn try_from(data: CircuitData) -> IrResult<Self> {
        Circuit::from_instructions(data.name, data.num_qubits, data.instructions)
    }
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// Build a circuit from instructions, validating each one.
    pub fn from_instructions(
        name: impl Into<String>,
        num_qubits: u32,
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> IrResult<Self> {
        let mut circuit = Self::with_size(name, num_qubits);
        for inst in instructions {
            circuit.push(inst)?;
        }
        Ok(circuit)
    }

    /// An empty circuit with the same name and qubit universe.
    pub fn empty_like(&self) -> Self {
        Self::with_size(self.name.clone(), self.num_qubits)
    }

    /// Append an instruction.
    ///
    /// Fails if an operand lies outside the universe, appears twice, or the
    /// operand count does not match the gate's arity.
    pub fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.check(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn check(&self, instruction: &Instruction) -> IrResult<()> {
        let gate_name = instruction.name();
        let expected = instruction.gate.num_qubits();
        if instruction.qubits.len() != expected as usize {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate_name.to_string(),
                expected,
                got: u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX),
            });
        }
        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitNotFound {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name: Some(gate_name.to_string()),
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: Some(gate_name.to_string()),
                });
            }
        }
        Ok(())
    }

    /// Apply an arbitrary gate.
    pub fn gate(
        &mut self,
        gate: impl Into<Gate>,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    fn single(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::single_qubit_gate(gate, qubit))
    }

    fn pair(&mut self, gate: StandardGate, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.push(Instruction::two_qubit_gate(gate, q1, q2))
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::X, qubit)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Y, qubit)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Z, qubit)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::S, qubit)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Sdg, qubit)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::T, qubit)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::SX, qubit)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rx(theta), qubit)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Ry(theta), qubit)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::Rz(theta), qubit)
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::P(lambda), qubit)
    }

    /// Apply universal U gate.
    pub fn u(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.single(StandardGate::U(theta, phi, lambda), qubit)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CX, control, target)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CY, control, target)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CZ, q1, q2)
    }

    /// Apply CZ raised to `exponent`.
    pub fn czpow(&mut self, exponent: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CZPow(exponent), q1, q2)
    }

    /// Apply controlled phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::CP(theta), control, target)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::Swap, q1, q2)
    }

    /// Apply iSWAP gate.
    pub fn iswap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::ISwap, q1, q2)
    }

    /// Apply ZZ rotation gate.
    pub fn rzz(&mut self, theta: f64, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.pair(StandardGate::RZZ(theta), q1, q2)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the size of the qubit universe.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Iterate over the qubit universe.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> {
        (0..self.num_qubits).map(QubitId)
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Iterate over instructions in program order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Consume the circuit, returning its instructions.
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit has no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of layers when every instruction is placed as early as its
    /// operands allow.
    pub fn depth(&self) -> usize {
        let mut frontier = vec![0usize; self.num_qubits as usize];
        let mut depth = 0;
        for inst in &self.instructions {
            let layer = inst
                .qubits
                .iter()
                .map(|q| frontier[q.index()])
                .max()
                .unwrap_or(0)
                + 1;
            for q in &inst.qubits {
                frontier[q.index()] = layer;
            }
            depth = depth.max(layer);
        }
        depth
    }

    /// Count instructions by gate name.
    pub fn count_ops(&self) -> FxHashMap<String, usize> {
        let mut counts = FxHashMap::default();
        for inst in &self.instructions {
            *counts.entry(inst.name().to_string()).or_insert(0) += 1;
        }
        counts
    }

    // =========================================================================
    // Semantics
    // =========================================================================

    /// Run the circuit on `initial`.
    ///
    /// Circuits wider than [`MAX_SIMULATION_QUBITS`] are refused.
    pub fn simulate(&self, initial: Statevector) -> IrResult<Statevector> {
        if self.num_qubits > MAX_SIMULATION_QUBITS {
            return Err(IrError::TooLarge {
                num_qubits: self.num_qubits,
                limit: MAX_SIMULATION_QUBITS,
            });
        }
        if initial.num_qubits() != self.num_qubits as usize {
            return Err(IrError::StateMismatch {
                expected: self.num_qubits,
                got: u32::try_from(initial.num_qubits()).unwrap_or(u32::MAX),
            });
        }
        let mut state = initial;
        for inst in &self.instructions {
            state.apply(inst);
        }
        Ok(state)
    }

    /// The total unitary of the circuit over the full qubit universe.
    ///
    /// Column `c` is the image of basis state `|c⟩`, where qubit `q` is bit
    /// `1 << q` of the index.
    pub fn unitary(&self) -> IrResult<Unitary> {
        if self.num_qubits > MAX_UNITARY_QUBITS {
            return Err(IrError::TooLarge {
                num_qubits: self.num_qubits,
                limit: MAX_UNITARY_QUBITS,
            });
        }
        let n = self.num_qubits as usize;
        let dim = 1usize << n;
        let mut out = Unitary::identity(dim);
        for column in 0..dim {
            let state = self.simulate(Statevector::basis(n, column))?;
            out.set_column(column, state.amplitudes());
        }
        Ok(out)
    }

    // =========================================================================
    // Standard circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit on `n` qubits.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::with_size(format!("ghz_{n}"), n);
        if n == 0 {
            return Ok(circuit);
        }
        circuit.h(QubitId(0))?;
        for i in 1..n {
            circuit.cx(QubitId(0), QubitId(i))?;
        }
        Ok(circuit)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
