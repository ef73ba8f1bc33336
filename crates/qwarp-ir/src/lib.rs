//! Qwarp Circuit Intermediate Representation
//!
//! This crate provides the core data structures the Qwarp compiler passes
//! operate on: gates with known unitaries, instructions over indexed qubits,
//! and a flat [`Circuit`] in program order.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] indexes a qubit in a circuit's universe
//! - **Gates**: [`StandardGate`] for built-in gates (H, X, CZ, CP, etc.) and
//!   [`CustomGate`] for user-defined unitaries
//! - **Instructions**: [`Instruction`] combining a gate with its ordered operands
//! - **Matrices**: [`Unitary`] dense complex matrices with global-phase aware
//!   comparison
//! - **Simulation**: [`Statevector`] for exact evolution of small circuits
//! - **Circuit**: [`Circuit`] high-level builder API
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qwarp_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Matrix conventions
//!
//! A gate's matrix treats its first operand as the most significant bit of
//! the local index, so `CX` on `(q0, q1)` controls on `q0`. Whole-circuit
//! unitaries and statevectors index qubit `q` as bit `1 << q`.
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `S`, `Sdg`, `T`, `Tdg` | 1 | Phase gates |
//! | `SX`, `SXdg` | 1 | sqrt(X) and its inverse |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Rotation and phase gates |
//! | `U` | 1 | Universal single-qubit gate U(θ,φ,λ) |
//! | `CX`, `CY`, `CZ` | 2 | Controlled Paulis |
//! | `CZPow` | 2 | CZ raised to a real exponent |
//! | `CP` | 2 | Controlled phase |
//! | `Swap`, `ISwap` | 2 | Swap gates |
//! | `RZZ` | 2 | ZZ rotation |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;
pub mod statevector;
pub mod unitary;

pub use circuit::{Circuit, MAX_SIMULATION_QUBITS, MAX_UNITARY_QUBITS};
pub use error::{IrError, IrResult};
pub use gate::{CustomGate, Gate, GateKind, StandardGate};
pub use instruction::Instruction;
pub use qubit::QubitId;
pub use statevector::Statevector;
pub use unitary::Unitary;
