//! Gauges for the controlled phase family.

use std::f64::consts::PI;
use std::sync::Arc;

use qwarp_ir::{Gate, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::gauge::{ConstantGauge, Gauge, GaugeSelector, GaugeTransformer, TargetMatcher};

/// An X frame times a Z frame around `CP(θ)`.
///
/// Z on either operand commutes with the diagonal gate and cancels. X on
/// exactly one operand turns `CP(θ)` into `CP(-θ)` up to a `P(θ)` on the
/// partner; X on both keeps `CP(θ)` and needs `P(θ)` on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CPhaseGauge {
    name: String,
    x: (bool, bool),
    z: (bool, bool),
}

impl CPhaseGauge {
    /// Gauge with X on the flagged operands and Z on the flagged operands.
    pub fn new(x: (bool, bool), z: (bool, bool)) -> Self {
        let flag = |b: bool, c: char| if b { c } else { 'I' };
        let name = format!(
            "{}{}_{}{}",
            flag(x.0, 'X'),
            flag(x.1, 'X'),
            flag(z.0, 'Z'),
            flag(z.1, 'Z')
        );
        Self { name, x, z }
    }

    /// All 16 combinations.
    pub fn all() -> Vec<CPhaseGauge> {
        let frames = [(false, false), (true, false), (false, true), (true, true)];
        frames
            .iter()
            .flat_map(|&x| frames.iter().map(move |&z| CPhaseGauge::new(x, z)))
            .collect()
    }

    fn angle(target: &Gate) -> CompileResult<f64> {
        match target.as_standard() {
            Some(StandardGate::CP(theta)) => Ok(*theta),
            Some(StandardGate::CZ) => Ok(PI),
            _ => Err(CompileError::InvalidConfiguration(format!(
                "cphase gauge cannot replace '{}'",
                target.name()
            ))),
        }
    }
}

impl Gauge for CPhaseGauge {
    fn name(&self) -> &str {
        &self.name
    }

    fn instantiate(&self, target: &Gate) -> CompileResult<ConstantGauge> {
        let theta = Self::angle(target)?;
        let gate = Gate::standard;

        let mut pre = (vec![], vec![]);
        let mut post = (vec![], vec![]);
        if self.z.0 {
            pre.0.push(gate(StandardGate::Z));
        }
        if self.z.1 {
            pre.1.push(gate(StandardGate::Z));
        }
        if self.x.0 {
            pre.0.push(gate(StandardGate::X));
            post.0.push(gate(StandardGate::X));
        }
        if self.x.1 {
            pre.1.push(gate(StandardGate::X));
            post.1.push(gate(StandardGate::X));
        }
        if self.x.0 {
            post.1.push(gate(StandardGate::P(theta)));
        }
        if self.x.1 {
            post.0.push(gate(StandardGate::P(theta)));
        }
        if self.z.0 {
            post.0.push(gate(StandardGate::Z));
        }
        if self.z.1 {
            post.1.push(gate(StandardGate::Z));
        }

        let replacement = if self.x.0 != self.x.1 {
            gate(StandardGate::CP(-theta))
        } else {
            gate(StandardGate::CP(theta))
        };
        Ok(ConstantGauge::new(self.name.clone(), replacement)
            .with_pre(pre.0, pre.1)
            .with_post(post.0, post.1))
    }
}

/// Gauge transformer for every `CP(θ)`, uniform over [`CPhaseGauge::all`].
pub fn cphase_gauge_transformer() -> CompileResult<GaugeTransformer> {
    let gauges = CPhaseGauge::all()
        .into_iter()
        .map(|g| Arc::new(g) as Arc<dyn Gauge>)
        .collect();
    let samples = [0.1, PI / 3.0, -1.2, PI, 2.5]
        .into_iter()
        .map(|theta| Gate::standard(StandardGate::CP(theta)));
    GaugeTransformer::new(
        "cphase_gauge",
        TargetMatcher::Named("cp".into()),
        GaugeSelector::uniform(gauges)?,
    )?
    .with_validation_targets(samples)
}
