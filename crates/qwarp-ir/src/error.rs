//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit is outside the circuit's universe.
    #[error("Qubit {qubit} not found in circuit of {num_qubits} qubits{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: QubitId,
        /// Size of the circuit's qubit universe.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A custom gate matrix has the wrong shape.
    #[error("Matrix for '{gate_name}' has {got} entries, expected {expected}")]
    MatrixShape {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of entries.
        expected: usize,
        /// Actual number of entries.
        got: usize,
    },

    /// A custom gate matrix is not unitary.
    #[error("Matrix for '{0}' is not unitary")]
    NotUnitary(String),

    /// A statevector does not match the circuit width.
    #[error("Statevector has {got} qubits, circuit has {expected}")]
    StateMismatch {
        /// Circuit width.
        expected: u32,
        /// Statevector width.
        got: u32,
    },

    /// Dense matrix or simulation requested for too many qubits.
    #[error("{num_qubits} qubits exceeds the dense limit of {limit}")]
    TooLarge {
        /// Requested number of qubits.
        num_qubits: u32,
        /// Maximum supported.
        limit: u32,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
