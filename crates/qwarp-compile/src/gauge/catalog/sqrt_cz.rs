//! Gauges for `CZ^±0.5`.

use std::sync::Arc;

use qwarp_ir::{Gate, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::gauge::{ConstantGauge, Gauge, GaugeSelector, GaugeTransformer, TargetMatcher};

/// One of the three sqrt-CZ gauges.
///
/// Flipping one operand with X inverts the phase of the replacement; an S
/// (or S-dagger for `CZ^-0.5`) on the partner restores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqrtCzGauge {
    /// Leave the gate alone.
    Identity,
    /// Conjugate the first operand by X.
    FlipQ0,
    /// Conjugate the second operand by X, with the replacement's operands
    /// exchanged.
    FlipQ1,
}

impl SqrtCzGauge {
    fn correction(target: &Gate) -> CompileResult<Gate> {
        match target.as_standard() {
            Some(StandardGate::CZPow(t)) if (t - 0.5).abs() < 1e-12 => Ok(StandardGate::S.into()),
            Some(StandardGate::CZPow(t)) if (t + 0.5).abs() < 1e-12 => Ok(StandardGate::Sdg.into()),
            _ => Err(CompileError::InvalidConfiguration(format!(
                "sqrt-CZ gauge cannot replace '{}'",
                target.name()
            ))),
        }
    }
}

impl Gauge for SqrtCzGauge {
    fn name(&self) -> &str {
        match self {
            SqrtCzGauge::Identity => "identity",
            SqrtCzGauge::FlipQ0 => "flip_q0",
            SqrtCzGauge::FlipQ1 => "flip_q1",
        }
    }

    fn weight(&self) -> f64 {
        match self {
            SqrtCzGauge::Identity => 2.0,
            SqrtCzGauge::FlipQ0 | SqrtCzGauge::FlipQ1 => 1.0,
        }
    }

    fn instantiate(&self, target: &Gate) -> CompileResult<ConstantGauge> {
        let correction = Self::correction(target)?;
        let x = || vec![Gate::standard(StandardGate::X)];
        let gauge = match self {
            SqrtCzGauge::Identity => ConstantGauge::identity(target.clone()),
            SqrtCzGauge::FlipQ0 => ConstantGauge::new(self.name(), target.inverse())
                .with_pre(x(), vec![])
                .with_post(x(), vec![correction]),
            SqrtCzGauge::FlipQ1 => ConstantGauge::new(self.name(), target.inverse())
                .with_pre(vec![], x())
                .with_post(vec![correction], x())
                .with_swap_qubits(),
        };
        Ok(gauge.with_weight(self.weight()))
    }
}

/// Gauge transformer for `CZ^0.5` and `CZ^-0.5`.
///
/// The identity gauge is chosen half the time, each flip a quarter.
pub fn sqrt_cz_gauge_transformer() -> CompileResult<GaugeTransformer> {
    let target = TargetMatcher::AnyOf(vec![
        TargetMatcher::Exact(StandardGate::CZPow(0.5).into()),
        TargetMatcher::Exact(StandardGate::CZPow(-0.5).into()),
    ]);
    let gauges: Vec<Arc<dyn Gauge>> = vec![
        Arc::new(SqrtCzGauge::Identity),
        Arc::new(SqrtCzGauge::FlipQ0),
        Arc::new(SqrtCzGauge::FlipQ1),
    ];
    GaugeTransformer::new("sqrt_cz_gauge", target, GaugeSelector::weighted(gauges)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::GAUGE_TOLERANCE;

    #[test]
    fn test_contract_for_both_signs() {
        for t in [0.5, -0.5] {
            let target = Gate::standard(StandardGate::CZPow(t));
            for gauge in [SqrtCzGauge::Identity, SqrtCzGauge::FlipQ0, SqrtCzGauge::FlipQ1] {
                gauge
                    .instantiate(&target)
                    .unwrap()
                    .check_contract(&target, GAUGE_TOLERANCE)
                    .unwrap();
            }
        }
    }

    #[test]
    fn test_flip_inverts_replacement() {
        let target = Gate::standard(StandardGate::CZPow(0.5));
        let gauge = SqrtCzGauge::FlipQ1.instantiate(&target).unwrap();
        assert_eq!(gauge.two_qubit_gate, Gate::standard(StandardGate::CZPow(-0.5)));
        assert!(gauge.swap_qubits);
        assert_eq!(gauge.post_q0, vec![Gate::standard(StandardGate::S)]);
    }

    #[test]
    fn test_rejects_other_exponents() {
        let target = Gate::standard(StandardGate::CZPow(0.25));
        assert!(SqrtCzGauge::FlipQ0.instantiate(&target).is_err());
    }

    #[test]
    fn test_selection_weights() {
        let t = sqrt_cz_gauge_transformer().unwrap();
        assert_eq!(t.selector().probabilities(), vec![0.5, 0.25, 0.25]);
    }
}
