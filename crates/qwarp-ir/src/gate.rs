//! Quantum gate types.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::circuit::MAX_UNITARY_QUBITS;
use crate::error::{IrError, IrResult};
use crate::unitary::Unitary;

/// Tolerance used when accepting user-supplied matrices as unitary.
const UNITARY_TOLERANCE: f64 = 1e-9;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Power of CZ: `diag(1, 1, 1, e^{iπt})`.
    CZPow(f64),
    /// Controlled phase gate: `diag(1, 1, 1, e^{iθ})`.
    CP(f64),
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// ZZ rotation gate.
    RZZ(f64),
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CZPow(_) => "czpow",
            StandardGate::CP(_) => "cp",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::RZZ(_) => "rzz",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CZPow(_)
            | StandardGate::CP(_)
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::RZZ(_) => 2,
        }
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CZPow(p)
            | StandardGate::CP(p)
            | StandardGate::RZZ(p) => vec![*p],

            StandardGate::U(a, b, c) => vec![*a, *b, *c],

            _ => vec![],
        }
    }

    /// The unitary matrix of this gate.
    pub fn matrix(&self) -> Unitary {
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match self {
            StandardGate::I => Unitary::identity(2),
            StandardGate::X => Unitary::x(),
            StandardGate::Y => Unitary::y(),
            StandardGate::Z => Unitary::z(),
            StandardGate::H => Unitary::h(),
            StandardGate::S => Unitary::s(),
            StandardGate::Sdg => Unitary::sdg(),
            StandardGate::T => Unitary::t(),
            StandardGate::Tdg => Unitary::tdg(),
            StandardGate::SX => Unitary::sx(),
            StandardGate::SXdg => Unitary::sxdg(),
            StandardGate::Rx(theta) => Unitary::rx(*theta),
            StandardGate::Ry(theta) => Unitary::ry(*theta),
            StandardGate::Rz(theta) => Unitary::rz(*theta),
            StandardGate::P(lambda) => Unitary::p(*lambda),
            StandardGate::U(theta, phi, lambda) => Unitary::u(*theta, *phi, *lambda),

            StandardGate::CX => Unitary::controlled(&Unitary::x()),
            StandardGate::CY => Unitary::controlled(&Unitary::y()),
            StandardGate::CZ => Unitary::diagonal(&[one, one, one, -one]),
            StandardGate::CZPow(t) => {
                Unitary::diagonal(&[one, one, one, Complex64::from_polar(1.0, PI * t)])
            }
            StandardGate::CP(theta) => {
                Unitary::diagonal(&[one, one, one, Complex64::from_polar(1.0, *theta)])
            }
            StandardGate::Swap => Unitary::monomial(&[(0, one), (2, one), (1, one), (3, one)]),
            StandardGate::ISwap => Unitary::monomial(&[(0, one), (2, i), (1, i), (3, one)]),
            StandardGate::RZZ(theta) => {
                let even = Complex64::from_polar(1.0, -theta / 2.0);
                let odd = Complex64::from_polar(1.0, theta / 2.0);
                Unitary::diagonal(&[even, odd, odd, even])
            }
        }
    }

    /// The inverse gate, if it is itself a standard gate.
    pub fn inverse(&self) -> Option<StandardGate> {
        let inv = match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::Swap => self.clone(),
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            StandardGate::SX => StandardGate::SXdg,
            StandardGate::SXdg => StandardGate::SX,
            StandardGate::Rx(theta) => StandardGate::Rx(-theta),
            StandardGate::Ry(theta) => StandardGate::Ry(-theta),
            StandardGate::Rz(theta) => StandardGate::Rz(-theta),
            StandardGate::P(lambda) => StandardGate::P(-lambda),
            StandardGate::U(theta, phi, lambda) => StandardGate::U(-theta, -lambda, -phi),
            StandardGate::CZPow(t) => StandardGate::CZPow(-t),
            StandardGate::CP(theta) => StandardGate::CP(-theta),
            StandardGate::RZZ(theta) => StandardGate::RZZ(-theta),
            StandardGate::ISwap => return None,
        };
        Some(inv)
    }
}

/// A quantum gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A user-defined gate with an explicit matrix.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
        }
    }
}

/// A user-defined gate carrying its own unitary.
///
/// Deserialization goes through [`CustomGate::from_entries`], so a gate read
/// from JSON has passed the same shape and unitarity checks as one built in
/// code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CustomGateData")]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Row-major unitary matrix, `2^n × 2^n`.
    matrix: Vec<Complex64>,
}

/// Unvalidated wire form of a [`CustomGate`].
#[derive(Deserialize)]
struct CustomGateData {
    name: String,
    num_qubits: u32,
    matrix: Vec<Complex64>,
}

impl TryFrom<CustomGateData> for CustomGate {
    type Error = IrError;

    fn try_from(data: CustomGateData) -> IrResult<Self> {
        CustomGate::from_entries(data.name, data.num_qubits, data.matrix)
    }
}

impl CustomGate {
    /// Create a new custom gate from its unitary.
    ///
    /// Fails if the matrix is not unitary.
    pub fn new(name: impl Into<String>, matrix: &Unitary) -> IrResult<Self> {
        let name = name.into();
        if !matrix.is_unitary(UNITARY_TOLERANCE) {
            return Err(IrError::NotUnitary(name));
        }
        Ok(Self {
            name,
            num_qubits: matrix.num_qubits(),
            matrix: matrix.data().to_vec(),
        })
    }

    /// Create a custom gate from row-major entries for `num_qubits` qubits.
    pub fn from_entries(
        name: impl Into<String>,
        num_qubits: u32,
        entries: Vec<Complex64>,
    ) -> IrResult<Self> {
        let name = name.into();
        if num_qubits > MAX_UNITARY_QUBITS {
            return Err(IrError::TooLarge {
                num_qubits,
                limit: MAX_UNITARY_QUBITS,
            });
        }
        let dim = 1usize << num_qubits;
        if entries.len() != dim * dim {
            return Err(IrError::MatrixShape {
                gate_name: name,
                expected: dim * dim,
                got: entries.len(),
            });
        }
        let matrix = Unitary::from_row_major(entries)?;
        Self::new(name, &matrix)
    }

    /// The unitary matrix of this gate.
    pub fn matrix(&self) -> Unitary {
        // Every constructor checks the shape.
        Unitary::from_parts(1 << self.num_qubits, self.matrix.clone())
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            label: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// Get the standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Custom(_) => None,
        }
    }

    /// The unitary matrix of this gate.
    pub fn matrix(&self) -> Unitary {
        match &self.kind {
            GateKind::Standard(g) => g.matrix(),
            GateKind::Custom(g) => g.matrix(),
        }
    }

    /// The inverse gate.
    ///
    /// Standard gates invert to standard gates where one exists; everything
    /// else becomes a custom gate carrying the adjoint matrix.
    pub fn inverse(&self) -> Gate {
        if let Some(inv) = self.as_standard().and_then(StandardGate::inverse) {
            return Gate::standard(inv);
        }
        let adjoint = self.matrix().dagger();
        let name = format!("{}_dg", self.name());
        Gate::custom(CustomGate {
            name,
            num_qubits: adjoint.num_qubits(),
            matrix: adjoint.data().to_vec(),
        })
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}
