//! Built-in compilation passes.
//!
//! - [`overlap`]: operand overlap test behind the reordering engine
//! - [`reorder`]: commutation-aware insertion-sort reordering
//! - [`pauli_insertion`]: random Pauli pairs before two-qubit gates
//!
//! Gauge substitution lives in [`crate::gauge`].

pub mod overlap;
pub mod pauli_insertion;
pub mod reorder;

pub use overlap::{MASK_WIDTH, OverlapOracle, OverlapSet};
pub use pauli_insertion::PauliInsertion;
pub use reorder::{
    CommutationReorder, CommutationRule, ReorderConfig, ReorderStats, reorder, reorder_with_stats,
};
