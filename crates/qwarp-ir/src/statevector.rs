//! Statevector simulation.
//!
//! Qubit `q` is bit `1 << q` of the amplitude index. Gate matrices are
//! applied to arbitrary operand positions, with the first operand taken as
//! the most significant bit of the gate's local index.

use num_complex::Complex64;

use crate::error::{IrError, IrResult};
use crate::instruction::Instruction;
use crate::unitary::Unitary;

/// A quantum state as a dense amplitude vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        Self::basis(num_qubits, 0)
    }

    /// Create the computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index % size] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Wrap existing amplitudes; the length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> IrResult<Self> {
        if amplitudes.is_empty() || !amplitudes.len().is_power_of_two() {
            return Err(IrError::MatrixShape {
                gate_name: "statevector".into(),
                expected: amplitudes.len().next_power_of_two(),
                got: amplitudes.len(),
            });
        }
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Measurement probabilities in the computational basis.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) {
        let targets: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        self.apply_matrix(&instruction.matrix(), &targets);
    }

    /// Apply a `2^k × 2^k` matrix to the `k` qubits in `targets`.
    pub fn apply_matrix(&mut self, matrix: &Unitary, targets: &[usize]) {
        let k = targets.len();
        let sub = 1usize << k;
        debug_assert_eq!(matrix.dim(), sub);
        let mask = targets.iter().fold(0usize, |m, &t| m | (1 << t));

        let mut indices = vec![0usize; sub];
        let mut buffer = vec![Complex64::new(0.0, 0.0); sub];

        for base in 0..self.amplitudes.len() {
            if base & mask != 0 {
                continue;
            }
            for (local, slot) in indices.iter_mut().enumerate() {
                let mut index = base;
                for (j, &t) in targets.iter().enumerate() {
                    if (local >> (k - 1 - j)) & 1 == 1 {
                        index |= 1 << t;
                    }
                }
                *slot = index;
            }
            for (r, out) in buffer.iter_mut().enumerate() {
                *out = indices
                    .iter()
                    .enumerate()
                    .map(|(c, &idx)| matrix.get(r, c) * self.amplitudes[idx])
                    .sum();
            }
            for (&idx, &value) in indices.iter().zip(&buffer) {
                self.amplitudes[idx] = value;
            }
        }
    }
}
