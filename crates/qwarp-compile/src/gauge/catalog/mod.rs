//! Built-in gauge sets.

mod cphase;
mod cz;
mod sqrt_cz;

pub use cphase::{CPhaseGauge, cphase_gauge_transformer};
pub use cz::{cz_gauge_transformer, cz_pauli_gauges};
pub use sqrt_cz::{SqrtCzGauge, sqrt_cz_gauge_transformer};
