//! Qwarp Compilation Passes
//!
//! This crate rewrites [`qwarp_ir::Circuit`]s without changing what they
//! compute, and checks that claim statistically.
//!
//! # Overview
//!
//! - **Reordering** ([`passes::reorder`]): a stable insertion sort that moves
//!   instructions earlier past commuting neighbours. Commutation is decided
//!   by an operand [`passes::OverlapOracle`] with a bitmask fast path.
//! - **Gauge substitution** ([`gauge`]): replaces each occurrence of a
//!   two-qubit target with a randomly chosen equivalent decomposition.
//! - **Pauli insertion** ([`passes::PauliInsertion`]): noise amplification by
//!   random Pauli pairs.
//! - **Equivalence checking** ([`equivalence`]): a Monte-Carlo harness that
//!   catches gauges violating their contract.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       |
//!       v
//! +-------------+
//! | PassManager | <-- PropertySet (seed, pass statistics)
//! +-------------+
//!       |
//!       +-- CommutationReorder
//!       +-- GaugeTransformer
//!       +-- PauliInsertion
//!       |
//!       v
//! Output Circuit
//! ```
//!
//! # Example
//!
//! ```rust
//! use qwarp_compile::{PassManagerBuilder, ReorderConfig};
//! use qwarp_compile::gauge::cz_gauge_transformer;
//! use qwarp_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("demo", 3);
//! circuit.cz(QubitId(1), QubitId(2)).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_reordering(ReorderConfig::default())
//!     .with_gauge(cz_gauge_transformer().unwrap())
//!     .with_seed(42)
//!     .build();
//!
//! let out = pm.run(&circuit, &mut props).unwrap();
//! assert!(out.unitary().unwrap().equal_up_to_global_phase(&circuit.unitary().unwrap(), 1e-6));
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use qwarp_compile::{Pass, PassKind, CompileResult, PropertySet};
//! use qwarp_ir::Circuit;
//!
//! struct MyCustomPass;
//!
//! impl Pass for MyCustomPass {
//!     fn name(&self) -> &str { "my_custom_pass" }
//!     fn kind(&self) -> PassKind { PassKind::Transformation }
//!
//!     fn run(&self, circuit: &Circuit, props: &mut PropertySet) -> CompileResult<Circuit> {
//!         Ok(circuit.clone())
//!     }
//! }
//! ```

pub mod equivalence;
pub mod error;
pub mod gauge;
pub mod manager;
pub mod pass;
pub mod property;

// Built-in passes
pub mod passes;

pub use equivalence::{EquivalenceHarness, HarnessConfig, HarnessReport, TrialFailure};
pub use error::{CompileError, CompileResult};
pub use gauge::{
    ConstantGauge, GAUGE_TOLERANCE, Gauge, GaugeSelector, GaugeStats, GaugeTransformer, Selection,
    TargetMatcher,
};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::{
    CommutationReorder, CommutationRule, OverlapOracle, OverlapSet, PauliInsertion, ReorderConfig,
    ReorderStats, reorder,
};
pub use property::PropertySet;
