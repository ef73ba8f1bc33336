//! Gauge substitution.
//!
//! A gauge rewrites one occurrence of a two-qubit target gate as
//! single-qubit pre-rotations, a replacement two-qubit gate and
//! single-qubit post-rotations whose product equals the target up to a
//! global phase. Randomizing the gauge per occurrence turns coherent
//! two-qubit errors into stochastic ones without changing what the circuit
//! computes.
//!
//! ```
//! use qwarp_compile::gauge::cz_gauge_transformer;
//! use qwarp_ir::{Circuit, QubitId};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut circuit = Circuit::with_size("c", 2);
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//!
//! let transformer = cz_gauge_transformer().unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//! let out = transformer.apply(&circuit, &mut rng).unwrap();
//!
//! assert_eq!(out.count_ops()["cz"], 1);
//! assert!(out.unitary().unwrap().equal_up_to_global_phase(&circuit.unitary().unwrap(), 1e-6));
//! ```

pub mod catalog;
pub mod constant;
pub mod matcher;
pub mod selector;
pub mod transformer;

pub use catalog::{cphase_gauge_transformer, cz_gauge_transformer, sqrt_cz_gauge_transformer};
pub use constant::{ConstantGauge, GAUGE_TOLERANCE};
pub use matcher::TargetMatcher;
pub use selector::{GaugeSelector, Selection};
pub use transformer::{GaugeStats, GaugeTransformer};

use std::fmt;

use qwarp_ir::Gate;

use crate::error::CompileResult;

/// A substitution rule for a two-qubit gate.
///
/// Parametric rules compute their constant form from the gate they are
/// asked to replace.
pub trait Gauge: Send + Sync + fmt::Debug {
    /// Name used in logs and statistics.
    fn name(&self) -> &str;

    /// Relative weight under [`Selection::Weighted`].
    fn weight(&self) -> f64 {
        1.0
    }

    /// The concrete substitution for `target`.
    fn instantiate(&self, target: &Gate) -> CompileResult<ConstantGauge>;
}
