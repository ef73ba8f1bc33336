//! Pauli gauges for CZ.

use std::sync::Arc;

use qwarp_ir::{Gate, StandardGate};

use crate::error::CompileResult;
use crate::gauge::{ConstantGauge, Gauge, GaugeSelector, GaugeTransformer};

/// `(pre, post)` Pauli pairs with `post = CZ · pre · CZ`, written `q0 q1`.
const CZ_PAULI_TABLE: [(&str, &str); 16] = [
    ("II", "II"),
    ("IX", "ZX"),
    ("IY", "ZY"),
    ("IZ", "IZ"),
    ("XI", "XZ"),
    ("XX", "YY"),
    ("XY", "YX"),
    ("XZ", "XI"),
    ("YI", "YZ"),
    ("YX", "XY"),
    ("YY", "XX"),
    ("YZ", "YI"),
    ("ZI", "ZI"),
    ("ZX", "IX"),
    ("ZY", "IY"),
    ("ZZ", "ZZ"),
];

fn pauli(label: u8) -> Vec<Gate> {
    match label {
        b'X' => vec![StandardGate::X.into()],
        b'Y' => vec![StandardGate::Y.into()],
        b'Z' => vec![StandardGate::Z.into()],
        _ => vec![],
    }
}

/// The 16 two-qubit Pauli gauges of CZ.
pub fn cz_pauli_gauges() -> Vec<ConstantGauge> {
    CZ_PAULI_TABLE
        .iter()
        .map(|&(name, post)| {
            let (pre, post) = (name.as_bytes(), post.as_bytes());
            ConstantGauge::new(name, StandardGate::CZ)
                .with_pre(pauli(pre[0]), pauli(pre[1]))
                .with_post(pauli(post[0]), pauli(post[1]))
        })
        .collect()
}

/// CZ gauge transformer: uniform over the Pauli gauges.
pub fn cz_gauge_transformer() -> CompileResult<GaugeTransformer> {
    let gauges = cz_pauli_gauges()
        .into_iter()
        .map(|g| Arc::new(g) as Arc<dyn Gauge>)
        .collect();
    GaugeTransformer::new(
        "cz_gauge",
        Gate::standard(StandardGate::CZ),
        GaugeSelector::uniform(gauges)?,
    )
}
