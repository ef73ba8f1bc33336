//! Error types for the compilation crate.

use qwarp_ir::{IrError, QubitId};
use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error bubbled up from the IR.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),

    /// A gauge does not reproduce its target gate.
    #[error(
        "Gauge '{gauge}' violates its contract for '{target}': deviation {deviation:.3e} exceeds {tolerance:.1e}"
    )]
    GaugeContractViolation {
        /// Name of the offending gauge.
        gauge: String,
        /// Name of the target gate it was checked against.
        target: String,
        /// Largest entry-wise deviation up to global phase.
        deviation: f64,
        /// Tolerance in effect.
        tolerance: f64,
    },

    /// A matched instruction has the wrong number of operands.
    #[error("Gauge target '{gate_name}' must act on 2 qubits, got {got}")]
    ArityMismatch {
        /// Name of the matched gate.
        gate_name: String,
        /// Operand count of the instruction.
        got: usize,
    },

    /// A qubit lies outside the universe an oracle was built for.
    #[error("Qubit {qubit} is outside a universe of {universe} qubits")]
    ResourceOutOfUniverse {
        /// The offending qubit.
        qubit: QubitId,
        /// Size of the universe.
        universe: usize,
    },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A probability table is not a distribution.
    #[error("Invalid probability distribution: {0}")]
    InvalidDistribution(String),

    /// A transformed circuit is not equivalent to its input.
    #[error("Equivalence check failed in {failed} of {trials} trials (worst deviation {worst:.3e})")]
    EquivalenceViolation {
        /// Number of failed trials.
        failed: usize,
        /// Number of trials run.
        trials: usize,
        /// Largest deviation observed.
        worst: f64,
    },

    /// Pass execution failed.
    #[error("Pass '{pass}' failed: {message}")]
    PassFailed {
        /// Name of the failed pass.
        pass: String,
        /// Error message.
        message: String,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
