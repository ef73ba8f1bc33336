//! Commutation-aware reordering.
//!
//! Instructions are insertion-sorted by their sorted operand indices. Each
//! new instruction walks backwards over the already placed ones and moves
//! past a placed instruction only when its key is strictly smaller and the
//! two commute. The first failure ends the walk, so the sort is stable and
//! placed instructions never change relative order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use qwarp_ir::{Circuit, Instruction, QubitId};

use super::overlap::{MASK_WIDTH, OverlapOracle, OverlapSet};
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// How the reordering engine decides that two instructions commute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommutationRule {
    /// Only instructions on disjoint operands commute.
    #[default]
    Operands,
    /// Disjoint instructions commute; overlapping ones commute iff their
    /// matrices do on the union of their operands.
    Unitary,
}

/// Configuration for [`reorder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    /// Largest universe for which operand sets are bitmasks.
    pub mask_threshold: usize,
    /// Commutation rule.
    pub commutation: CommutationRule,
    /// Tolerance for the numerical commutator under [`CommutationRule::Unitary`].
    pub unitary_tolerance: f64,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            mask_threshold: MASK_WIDTH,
            commutation: CommutationRule::Operands,
            unitary_tolerance: 1e-9,
        }
    }
}

impl ReorderConfig {
    /// Use the given commutation rule.
    #[must_use]
    pub fn with_commutation(mut self, rule: CommutationRule) -> Self {
        self.commutation = rule;
        self
    }

    /// Use the given mask threshold.
    #[must_use]
    pub fn with_mask_threshold(mut self, threshold: usize) -> Self {
        self.mask_threshold = threshold;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> CompileResult<()> {
        if !(self.unitary_tolerance.is_finite() && self.unitary_tolerance > 0.0) {
            return Err(CompileError::InvalidConfiguration(format!(
                "unitary_tolerance must be positive, got {}",
                self.unitary_tolerance
            )));
        }
        Ok(())
    }
}

/// What a reordering run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderStats {
    /// Number of instructions processed.
    pub instructions: usize,
    /// Instructions placed ahead of at least one earlier instruction.
    pub moved: usize,
    /// Depth of the input.
    pub depth_before: usize,
    /// Depth of the output.
    pub depth_after: usize,
}

struct Placed {
    instruction: Instruction,
    operands: OverlapSet,
    key: Vec<usize>,
}

/// Reorder `circuit`, returning a new circuit and statistics.
pub fn reorder_with_stats(
    circuit: &Circuit,
    config: &ReorderConfig,
) -> CompileResult<(Circuit, ReorderStats)> {
    config.validate()?;
    let oracle = OverlapOracle::new(circuit.num_qubits() as usize, config.mask_threshold);
    debug!(
        "Reordering {} instructions over {} qubits (mask path: {})",
        circuit.len(),
        circuit.num_qubits(),
        oracle.uses_mask()
    );

    let mut placed: Vec<Placed> = Vec::with_capacity(circuit.len());
    let mut moved = 0;

    for inst in circuit {
        let item = Placed {
            operands: oracle.operand_set(&inst.qubits)?,
            key: inst.sorted_operand_indices(),
            instruction: inst.clone(),
        };

        let mut pos = placed.len();
        while pos > 0 {
            let prev = &placed[pos - 1];
            if item.key < prev.key && commutes(&oracle, config, &item, prev)? {
                pos -= 1;
            } else {
                break;
            }
        }
        if pos < placed.len() {
            moved += 1;
        }
        placed.insert(pos, item);
    }

    let out = Circuit::from_instructions(
        circuit.name(),
        circuit.num_qubits(),
        placed.into_iter().map(|p| p.instruction),
    )?;
    let stats = ReorderStats {
        instructions: circuit.len(),
        moved,
        depth_before: circuit.depth(),
        depth_after: out.depth(),
    };
    Ok((out, stats))
}

/// Reorder `circuit` according to `config`.
pub fn reorder(circuit: &Circuit, config: &ReorderConfig) -> CompileResult<Circuit> {
    reorder_with_stats(circuit, config).map(|(out, _)| out)
}

fn commutes(
    oracle: &OverlapOracle,
    config: &ReorderConfig,
    a: &Placed,
    b: &Placed,
) -> CompileResult<bool> {
    if oracle.commutes(&a.operands, &b.operands) {
        return Ok(true);
    }
    match config.commutation {
        CommutationRule::Operands => Ok(false),
        CommutationRule::Unitary => {
            matrices_commute(&a.instruction, &b.instruction, config.unitary_tolerance)
        }
    }
}

/// Embed both instructions on the union of their operands and compare
/// `AB` with `BA`.
fn matrices_commute(a: &Instruction, b: &Instruction, tol: f64) -> CompileResult<bool> {
    let mut union: Vec<QubitId> = a.qubits.clone();
    for &q in &b.qubits {
        if !union.contains(&q) {
            union.push(q);
        }
    }
    let local = |inst: &Instruction| -> CompileResult<Circuit> {
        let remapped = inst
            .qubits
            .iter()
            .map(|q| union.iter().position(|u| u == q).map(QubitId::from))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| CompileError::PassFailed {
                pass: "CommutationReorder".into(),
                message: format!("operand of '{}' missing from union", inst.name()),
            })?;
        let n = u32::try_from(union.len()).unwrap_or(u32::MAX);
        Ok(Circuit::from_instructions(
            "local",
            n,
            [Instruction::gate(inst.gate.clone(), remapped)],
        )?)
    };
    let ua = local(a)?.unitary()?;
    let ub = local(b)?.unitary()?;
    Ok(ua.commutes_with(&ub, tol))
}

/// Pass wrapper around [`reorder`].
///
/// Records [`ReorderStats`] in the property set.
#[derive(Debug, Clone, Default)]
pub struct CommutationReorder {
    config: ReorderConfig,
}

impl CommutationReorder {
    /// Create a reordering pass with the given configuration.
    pub fn new(config: ReorderConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }
}

impl Pass for CommutationReorder {
    fn name(&self) -> &'static str {
        "CommutationReorder"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let (out, stats) = reorder_with_stats(circuit, &self.config)?;
        debug!(
            "Reordered: {} of {} instructions moved, depth {} -> {}",
            stats.moved, stats.instructions, stats.depth_before, stats.depth_after
        );
        properties.insert(stats);
        Ok(out)
    }

    fn should_run(&self, circuit: &Circuit, _properties: &PropertySet) -> bool {
        circuit.len() > 1
    }
}
