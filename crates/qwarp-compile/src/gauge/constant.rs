//! Fixed gauges.

use serde::{Deserialize, Serialize};

use qwarp_ir::{Gate, Instruction, QubitId, StandardGate, Unitary};

use super::Gauge;
use crate::error::{CompileError, CompileResult};

/// Default tolerance for the gauge contract.
pub const GAUGE_TOLERANCE: f64 = 1e-6;

/// A fully determined substitution.
///
/// Rotations in each list are applied in order. The replacement acts on
/// `(q0, q1)`, or on `(q1, q0)` when `swap_qubits` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantGauge {
    /// Name used in logs and statistics.
    pub name: String,
    /// Relative selection weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Rotations on the first operand before the replacement.
    #[serde(default)]
    pub pre_q0: Vec<Gate>,
    /// Rotations on the second operand before the replacement.
    #[serde(default)]
    pub pre_q1: Vec<Gate>,
    /// Rotations on the first operand after the replacement.
    #[serde(default)]
    pub post_q0: Vec<Gate>,
    /// Rotations on the second operand after the replacement.
    #[serde(default)]
    pub post_q1: Vec<Gate>,
    /// The replacement two-qubit gate.
    pub two_qubit_gate: Gate,
    /// Apply the replacement with its operands exchanged.
    #[serde(default)]
    pub swap_qubits: bool,
}

fn default_weight() -> f64 {
    1.0
}

impl ConstantGauge {
    /// A gauge that replaces a gate with `two_qubit_gate` and nothing else.
    pub fn new(name: impl Into<String>, two_qubit_gate: impl Into<Gate>) -> Self {
        Self {
            name: name.into(),
            weight: 1.0,
            pre_q0: vec![],
            pre_q1: vec![],
            post_q0: vec![],
            post_q1: vec![],
            two_qubit_gate: two_qubit_gate.into(),
            swap_qubits: false,
        }
    }

    /// The no-op gauge for `target`.
    pub fn identity(target: impl Into<Gate>) -> Self {
        Self::new("identity", target)
    }

    /// Set the pre-rotations.
    #[must_use]
    pub fn with_pre(mut self, q0: Vec<Gate>, q1: Vec<Gate>) -> Self {
        self.pre_q0 = q0;
        self.pre_q1 = q1;
        self
    }

    /// Set the post-rotations.
    #[must_use]
    pub fn with_post(mut self, q0: Vec<Gate>, q1: Vec<Gate>) -> Self {
        self.post_q0 = q0;
        self.post_q1 = q1;
        self
    }

    /// Apply the replacement with its operands exchanged.
    #[must_use]
    pub fn with_swap_qubits(mut self) -> Self {
        self.swap_qubits = true;
        self
    }

    /// Set the selection weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Check that every rotation is single-qubit and the replacement is
    /// two-qubit.
    fn check_shape(&self) -> CompileResult<()> {
        if self.two_qubit_gate.num_qubits() != 2 {
            return Err(CompileError::ArityMismatch {
                gate_name: self.two_qubit_gate.name().to_string(),
                got: self.two_qubit_gate.num_qubits() as usize,
            });
        }
        let rotations = [&self.pre_q0, &self.pre_q1, &self.post_q0, &self.post_q1];
        if let Some(g) = rotations
            .into_iter()
            .flatten()
            .find(|g| g.num_qubits() != 1)
        {
            return Err(CompileError::InvalidConfiguration(format!(
                "gauge '{}' uses '{}' as a single-qubit rotation",
                self.name,
                g.name()
            )));
        }
        Ok(())
    }

    /// `post · replacement · pre` on the `(q0, q1)` basis, with `q0` as the
    /// most significant bit.
    pub fn composed_unitary(&self) -> CompileResult<Unitary> {
        self.check_shape()?;
        let pre = chain(&self.pre_q0).kron(&chain(&self.pre_q1));
        let post = chain(&self.post_q0).kron(&chain(&self.post_q1));
        let mut replacement = self.two_qubit_gate.matrix();
        if self.swap_qubits {
            let swap = StandardGate::Swap.matrix();
            replacement = &(&swap * &replacement) * &swap;
        }
        Ok(&(&post * &replacement) * &pre)
    }

    /// Verify that this gauge reproduces `target` up to global phase.
    pub fn check_contract(&self, target: &Gate, tolerance: f64) -> CompileResult<()> {
        if target.num_qubits() != 2 {
            return Err(CompileError::ArityMismatch {
                gate_name: target.name().to_string(),
                got: target.num_qubits() as usize,
            });
        }
        let deviation = self
            .composed_unitary()?
            .deviation_up_to_global_phase(&target.matrix());
        if deviation > tolerance {
            return Err(CompileError::GaugeContractViolation {
                gauge: self.name.clone(),
                target: target.name().to_string(),
                deviation,
                tolerance,
            });
        }
        Ok(())
    }

    /// The instructions replacing one occurrence on `(q0, q1)`.
    pub fn instructions(&self, q0: QubitId, q1: QubitId) -> Vec<Instruction> {
        let mut out = Vec::with_capacity(
            1 + self.pre_q0.len() + self.pre_q1.len() + self.post_q0.len() + self.post_q1.len(),
        );
        out.extend(self.pre_q0.iter().map(|g| Instruction::gate(g.clone(), [q0])));
        out.extend(self.pre_q1.iter().map(|g| Instruction::gate(g.clone(), [q1])));
        let operands = if self.swap_qubits { [q1, q0] } else { [q0, q1] };
        out.push(Instruction::gate(self.two_qubit_gate.clone(), operands));
        out.extend(self.post_q0.iter().map(|g| Instruction::gate(g.clone(), [q0])));
        out.extend(self.post_q1.iter().map(|g| Instruction::gate(g.clone(), [q1])));
        out
    }
}

/// Product of single-qubit gates applied in list order.
fn chain(gates: &[Gate]) -> Unitary {
    gates
        .iter()
        .fold(Unitary::identity(2), |acc, g| &g.matrix() * &acc)
}

impl Gauge for ConstantGauge {
    fn name(&self) -> &str {
        &self.name
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn instantiate(&self, _target: &Gate) -> CompileResult<ConstantGauge> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn g(gate: StandardGate) -> Gate {
        Gate::standard(gate)
    }

    #[test]
    fn test_identity_gauge_contract() {
        let cz = g(StandardGate::CZ);
        let gauge = ConstantGauge::identity(cz.clone());
        gauge.check_contract(&cz, GAUGE_TOLERANCE).unwrap();
        assert_eq!(
            gauge.instructions(QubitId(3), QubitId(1)),
            vec![Instruction::gate(cz, [QubitId(3), QubitId(1)])]
        );
    }

    #[test]
    fn test_x_flip_on_cz() {
        // X on q0 before CZ becomes X on q0 and Z on q1 after it.
        let cz = g(StandardGate::CZ);
        let gauge = ConstantGauge::new("XI", cz.clone())
            .with_pre(vec![g(StandardGate::X)], vec![])
            .with_post(vec![g(StandardGate::X)], vec![g(StandardGate::Z)]);
        gauge.check_contract(&cz, GAUGE_TOLERANCE).unwrap();

        let wrong = ConstantGauge::new("XI_bad", cz.clone())
            .with_pre(vec![g(StandardGate::X)], vec![])
            .with_post(vec![g(StandardGate::X)], vec![]);
        assert!(matches!(
            wrong.check_contract(&cz, GAUGE_TOLERANCE),
            Err(CompileError::GaugeContractViolation { .. })
        ));
    }

    #[test]
    fn test_swap_qubits_on_asymmetric_gate() {
        // CX with swapped operands is a different gate.
        let cx = g(StandardGate::CX);
        let swapped = ConstantGauge::identity(cx.clone()).with_swap_qubits();
        assert!(swapped.check_contract(&cx, GAUGE_TOLERANCE).is_err());

        // H on both sides of a reversed CX gives CX back.
        let h = || vec![g(StandardGate::H)];
        let conjugated = ConstantGauge::new("hh", cx.clone())
            .with_swap_qubits()
            .with_pre(h(), h())
            .with_post(h(), h());
        conjugated.check_contract(&cx, GAUGE_TOLERANCE).unwrap();

        let ops = conjugated.instructions(QubitId(0), QubitId(1));
        assert_eq!(ops.len(), 5);
        assert_eq!(ops[2].qubits, vec![QubitId(1), QubitId(0)]);
    }

    #[test]
    fn test_rotation_order_within_list() {
        // S then H is not H then S.
        let cz = g(StandardGate::CZ);
        let a = ConstantGauge::new("a", cz.clone())
            .with_pre(vec![g(StandardGate::S), g(StandardGate::H)], vec![]);
        let b = ConstantGauge::new("b", cz)
            .with_pre(vec![g(StandardGate::H), g(StandardGate::S)], vec![]);
        let ua = a.composed_unitary().unwrap();
        let ub = b.composed_unitary().unwrap();
        assert!(!ua.equal_up_to_global_phase(&ub, 1e-6));
    }

    #[test]
    fn test_shape_errors() {
        let not_two = ConstantGauge::new("one", g(StandardGate::X));
        assert!(matches!(
            not_two.composed_unitary(),
            Err(CompileError::ArityMismatch { got: 1, .. })
        ));

        let bad_rotation = ConstantGauge::new("rot", g(StandardGate::CZ))
            .with_pre(vec![g(StandardGate::CZ)], vec![]);
        assert!(matches!(
            bad_rotation.composed_unitary(),
            Err(CompileError::InvalidConfiguration(_))
        ));
    }
}
