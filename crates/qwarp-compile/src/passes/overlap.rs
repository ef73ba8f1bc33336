//! Operand overlap test used as the commutation oracle.
//!
//! Two instructions on disjoint operands can always be reordered. The oracle
//! answers that question with a single `u64` AND when the qubit universe is
//! small enough, and with a set intersection otherwise. Both representations
//! give the same answer for the same operands.

use std::collections::BTreeSet;

use qwarp_ir::QubitId;

use crate::error::{CompileError, CompileResult};

/// Number of qubits a mask can address.
pub const MASK_WIDTH: usize = u64::BITS as usize;

/// The operands of one instruction, in either representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlapSet {
    /// Bit `q` set iff qubit `q` is an operand.
    Mask(u64),
    /// Explicit set of operands.
    Set(BTreeSet<QubitId>),
}

impl OverlapSet {
    /// Build the mask form. Every qubit must be below [`MASK_WIDTH`].
    fn mask(qubits: &[QubitId]) -> Self {
        OverlapSet::Mask(qubits.iter().fold(0u64, |m, q| m | (1u64 << q.0)))
    }

    /// Build the set form.
    fn set(qubits: &[QubitId]) -> Self {
        OverlapSet::Set(qubits.iter().copied().collect())
    }

    /// Check whether `qubit` is a member.
    pub fn contains(&self, qubit: QubitId) -> bool {
        match self {
            OverlapSet::Mask(m) => qubit.index() < MASK_WIDTH && m & (1u64 << qubit.0) != 0,
            OverlapSet::Set(s) => s.contains(&qubit),
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        match self {
            OverlapSet::Mask(m) => m.count_ones() as usize,
            OverlapSet::Set(s) => s.len(),
        }
    }

    /// Check if there are no members.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether the two sets share a qubit.
    pub fn overlaps(&self, other: &OverlapSet) -> bool {
        match (self, other) {
            (OverlapSet::Mask(a), OverlapSet::Mask(b)) => a & b != 0,
            (OverlapSet::Set(a), OverlapSet::Set(b)) => !a.is_disjoint(b),
            (OverlapSet::Mask(m), OverlapSet::Set(s)) | (OverlapSet::Set(s), OverlapSet::Mask(m)) => s
                .iter()
                .any(|q| q.index() < MASK_WIDTH && m & (1u64 << q.0) != 0),
        }
    }
}

/// Decides whether two instructions may swap places based on operands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapOracle {
    universe: usize,
    use_mask: bool,
}

impl OverlapOracle {
    /// Create an oracle for qubits `0..universe`.
    ///
    /// The mask representation is used iff
    /// `universe <= min(mask_threshold, MASK_WIDTH)`.
    pub fn new(universe: usize, mask_threshold: usize) -> Self {
        Self {
            universe,
            use_mask: universe <= mask_threshold.min(MASK_WIDTH),
        }
    }

    /// Size of the qubit universe.
    pub fn universe(&self) -> usize {
        self.universe
    }

    /// Whether operand sets are built as masks.
    pub fn uses_mask(&self) -> bool {
        self.use_mask
    }

    /// Build the operand set of an instruction.
    ///
    /// A qubit outside the universe is rejected rather than dropped from
    /// the mask.
    pub fn operand_set(&self, qubits: &[QubitId]) -> CompileResult<OverlapSet> {
        if let Some(&qubit) = qubits.iter().find(|q| q.index() >= self.universe) {
            return Err(CompileError::ResourceOutOfUniverse {
                qubit,
                universe: self.universe,
            });
        }
        Ok(if self.use_mask {
            OverlapSet::mask(qubits)
        } else {
            OverlapSet::set(qubits)
        })
    }

    /// Two instructions commute iff their operand sets are disjoint.
    pub fn commutes(&self, a: &OverlapSet, b: &OverlapSet) -> bool {
        !a.overlaps(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn qubits(indices: &[u32]) -> Vec<QubitId> {
        indices.iter().copied().map(QubitId).collect()
    }

    #[test]
    fn test_path_selection() {
        assert!(OverlapOracle::new(5, 64).uses_mask());
        assert!(!OverlapOracle::new(5, 1).uses_mask());
        assert!(OverlapOracle::new(64, 64).uses_mask());
        assert!(!OverlapOracle::new(65, 1000).uses_mask());
    }

    #[test]
    fn test_commutes_disjoint_only() {
        let oracle = OverlapOracle::new(5, 64);
        let a = oracle.operand_set(&qubits(&[2, 1])).unwrap();
        let b = oracle.operand_set(&qubits(&[0, 1])).unwrap();
        let c = oracle.operand_set(&qubits(&[3, 4])).unwrap();
        assert!(!oracle.commutes(&a, &b));
        assert!(oracle.commutes(&a, &c));
        assert!(oracle.commutes(&b, &c));
    }

    #[test]
    fn test_rejects_out_of_universe() {
        for threshold in [1, 64] {
            let oracle = OverlapOracle::new(4, threshold);
            let err = oracle.operand_set(&qubits(&[1, 4])).unwrap_err();
            assert!(matches!(
                err,
                CompileError::ResourceOutOfUniverse {
                    qubit: QubitId(4),
                    universe: 4
                }
            ));
        }
    }

    #[test]
    fn test_boundary_qubit_63() {
        let oracle = OverlapOracle::new(MASK_WIDTH, MASK_WIDTH);
        let a = oracle.operand_set(&qubits(&[63, 0])).unwrap();
        let b = oracle.operand_set(&qubits(&[63])).unwrap();
        assert_eq!(a, OverlapSet::Mask((1 << 63) | 1));
        assert!(!oracle.commutes(&a, &b));
    }

    #[test]
    fn test_mixed_representations() {
        let mask = OverlapOracle::new(8, 64).operand_set(&qubits(&[1, 6])).unwrap();
        let set = OverlapOracle::new(8, 0).operand_set(&qubits(&[6, 7])).unwrap();
        let far = OverlapSet::Set(qubits(&[100]).into_iter().collect());
        assert!(mask.overlaps(&set));
        assert!(set.overlaps(&mask));
        assert!(!mask.overlaps(&far));
        assert_eq!(mask.len(), 2);
    }

    fn operand_pair(universe: u32) -> impl Strategy<Value = Vec<QubitId>> {
        prop::sample::subsequence((0..universe).collect::<Vec<_>>(), 1..=2)
            .prop_shuffle()
            .prop_map(|v| v.into_iter().map(QubitId).collect())
    }

    proptest! {
        #[test]
        fn prop_mask_matches_set_small(a in operand_pair(8), b in operand_pair(8)) {
            let fast = OverlapOracle::new(8, 64);
            let slow = OverlapOracle::new(8, 0);
            prop_assert_eq!(
                fast.commutes(&fast.operand_set(&a).unwrap(), &fast.operand_set(&b).unwrap()),
                slow.commutes(&slow.operand_set(&a).unwrap(), &slow.operand_set(&b).unwrap())
            );
        }

        #[test]
        fn prop_mask_matches_set_at_width(a in operand_pair(64), b in operand_pair(64)) {
            let fast = OverlapOracle::new(MASK_WIDTH, MASK_WIDTH);
            let slow = OverlapOracle::new(MASK_WIDTH, 0);
            prop_assert!(fast.uses_mask());
            prop_assert!(!slow.uses_mask());
            prop_assert_eq!(
                fast.commutes(&fast.operand_set(&a).unwrap(), &fast.operand_set(&b).unwrap()),
                slow.commutes(&slow.operand_set(&a).unwrap(), &slow.operand_set(&b).unwrap())
            );
        }
    }
}
