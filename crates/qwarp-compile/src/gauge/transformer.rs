//! Gauge substitution over whole circuits.

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use qwarp_ir::{Circuit, Gate};

use super::constant::GAUGE_TOLERANCE;
use super::matcher::TargetMatcher;
use super::selector::GaugeSelector;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// What a gauge run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GaugeStats {
    /// Number of target occurrences rewritten.
    pub substituted: usize,
    /// Occurrences per chosen gauge name.
    pub by_gauge: FxHashMap<String, usize>,
}

/// Rewrites every occurrence of a target gate with a randomly chosen gauge.
#[derive(Debug, Clone)]
pub struct GaugeTransformer {
    name: String,
    target: TargetMatcher,
    selector: GaugeSelector,
    validation_targets: Vec<Gate>,
}

impl GaugeTransformer {
    /// Create a transformer and check every gauge against every gate the
    /// target can enumerate.
    pub fn new(
        name: impl Into<String>,
        target: impl Into<TargetMatcher>,
        selector: GaugeSelector,
    ) -> CompileResult<Self> {
        let transformer = Self::new_unchecked(name, target, selector);
        transformer.validate()?;
        Ok(transformer)
    }

    /// Create a transformer without checking the gauge contract.
    pub fn new_unchecked(
        name: impl Into<String>,
        target: impl Into<TargetMatcher>,
        selector: GaugeSelector,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            selector,
            validation_targets: vec![],
        }
    }

    /// Add sample gates to validate against and re-validate.
    ///
    /// Needed for named families, which cannot enumerate their members.
    pub fn with_validation_targets(
        mut self,
        targets: impl IntoIterator<Item = Gate>,
    ) -> CompileResult<Self> {
        self.validation_targets.extend(targets);
        self.validate()?;
        Ok(self)
    }

    /// Check the gauge contract for every gauge and known target.
    pub fn validate(&self) -> CompileResult<()> {
        let targets = self
            .target
            .representatives()
            .into_iter()
            .chain(self.validation_targets.iter().cloned());
        for target in targets {
            for gauge in self.selector.gauges() {
                gauge
                    .instantiate(&target)?
                    .check_contract(&target, GAUGE_TOLERANCE)?;
            }
        }
        Ok(())
    }

    /// The transformer's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The target matcher.
    pub fn target(&self) -> &TargetMatcher {
        &self.target
    }

    /// The gauge selector.
    pub fn selector(&self) -> &GaugeSelector {
        &self.selector
    }

    /// Rewrite `circuit`.
    pub fn apply<R: Rng + ?Sized>(&self, circuit: &Circuit, rng: &mut R) -> CompileResult<Circuit> {
        self.apply_with_stats(circuit, rng).map(|(out, _)| out)
    }

    /// Rewrite `circuit`, also reporting which gauges were used.
    ///
    /// One draw from `rng` per matched occurrence; nothing else consumes
    /// entropy.
    #[instrument(skip_all, fields(transformer = %self.name))]
    pub fn apply_with_stats<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        rng: &mut R,
    ) -> CompileResult<(Circuit, GaugeStats)> {
        let mut out = circuit.empty_like();
        let mut stats = GaugeStats::default();

        for inst in circuit {
            if !self.target.matches(&inst.gate) {
                out.push(inst.clone())?;
                continue;
            }
            let &[q0, q1] = inst.qubits.as_slice() else {
                return Err(CompileError::ArityMismatch {
                    gate_name: inst.name().to_string(),
                    got: inst.qubits.len(),
                });
            };
            let gauge = self.selector.select(rng);
            let constant = gauge.instantiate(&inst.gate)?;
            for replacement in constant.instructions(q0, q1) {
                out.push(replacement)?;
            }
            stats.substituted += 1;
            *stats.by_gauge.entry(gauge.name().to_string()).or_insert(0) += 1;
        }

        debug!(
            "Substituted {} occurrences, {} -> {} instructions",
            stats.substituted,
            circuit.len(),
            out.len()
        );
        Ok((out, stats))
    }
}

impl Pass for GaugeTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        let mut rng = properties.rng(&self.name);
        let (out, stats) = self.apply_with_stats(circuit, &mut rng)?;
        properties.insert(stats);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::{ConstantGauge, Gauge};
    use qwarp_ir::{CustomGate, Instruction, QubitId, StandardGate};
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    use std::sync::Arc;

    fn noop_transformer() -> GaugeTransformer {
        let cz = Gate::standard(StandardGate::CZ);
        let gauges: Vec<Arc<dyn Gauge>> = vec![Arc::new(ConstantGauge::identity(cz.clone()))];
        GaugeTransformer::new("noop", cz, GaugeSelector::uniform(gauges).unwrap()).unwrap()
    }

    fn sample_circuit() -> Circuit {
        let mut c = Circuit::with_size("sample", 3);
        c.h(QubitId(0))
            .unwrap()
            .cz(QubitId(0), QubitId(1))
            .unwrap()
            .rx(0.4, QubitId(2))
            .unwrap()
            .cz(QubitId(2), QubitId(1))
            .unwrap();
        c
    }

    #[test]
    fn test_noop_gauge_is_idempotent() {
        let transformer = noop_transformer();
        let circuit = sample_circuit();
        let mut rng = StdRng::seed_from_u64(0);
        let out = transformer.apply(&circuit, &mut rng).unwrap();
        assert_eq!(out, circuit);
    }

    #[test]
    fn test_non_matching_pass_through() {
        let transformer = noop_transformer();
        let mut circuit = Circuit::with_size("none", 2);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let (out, stats) = transformer
            .apply_with_stats(&circuit, &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(out, circuit);
        assert_eq!(stats.substituted, 0);
    }

    #[test]
    fn test_bad_gauge_rejected_at_construction() {
        let cz = Gate::standard(StandardGate::CZ);
        let bad = ConstantGauge::identity(cz.clone())
            .with_pre(vec![Gate::standard(StandardGate::X)], vec![]);
        let gauges: Vec<Arc<dyn Gauge>> = vec![Arc::new(bad)];
        let selector = GaugeSelector::uniform(gauges).unwrap();
        assert!(matches!(
            GaugeTransformer::new("bad", cz.clone(), selector.clone()),
            Err(CompileError::GaugeContractViolation { .. })
        ));
        let unchecked = GaugeTransformer::new_unchecked("bad", cz, selector);
        assert!(unchecked.validate().is_err());
    }

    #[test]
    fn test_arity_mismatch_is_an_error() {
        let one_qubit = CustomGate::new("blob", &qwarp_ir::Unitary::h()).unwrap();
        let gauges: Vec<Arc<dyn Gauge>> =
            vec![Arc::new(ConstantGauge::identity(StandardGate::CZ))];
        let transformer = GaugeTransformer::new(
            "blob",
            TargetMatcher::Named("blob".into()),
            GaugeSelector::uniform(gauges).unwrap(),
        )
        .unwrap();

        let mut circuit = Circuit::with_size("c", 1);
        circuit
            .push(Instruction::gate(one_qubit, [QubitId(0)]))
            .unwrap();
        let err = transformer
            .apply(&circuit, &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(err, CompileError::ArityMismatch { got: 1, .. }));
    }

    #[test]
    fn test_one_draw_per_occurrence() {
        let transformers = [
            crate::gauge::cz_gauge_transformer().unwrap(),
            crate::gauge::sqrt_cz_gauge_transformer().unwrap(),
        ];
        for transformer in &transformers {
            let target = transformer.target().representatives()[0].clone();
            let mut circuit = Circuit::with_size("k", 3);
            for k in 0..5u32 {
                circuit
                    .gate(target.clone(), [QubitId(k % 3), QubitId((k + 1) % 3)])
                    .unwrap()
                    .h(QubitId(k % 3))
                    .unwrap();
            }

            let mut rng = StdRng::seed_from_u64(21);
            let mut twin = StdRng::seed_from_u64(21);
            let (_, stats) = transformer.apply_with_stats(&circuit, &mut rng).unwrap();
            assert_eq!(stats.substituted, 5);
            for _ in 0..5 {
                transformer.selector().select(&mut twin);
            }
            assert_eq!(rng.next_u64(), twin.next_u64());
        }
    }

    #[test]
    fn test_pass_uses_property_seed() {
        let transformer = crate::gauge::cz_gauge_transformer().unwrap();
        let circuit = sample_circuit();
        let run = |seed| {
            let mut props = PropertySet::new().with_seed(seed);
            let out = transformer.run(&circuit, &mut props).unwrap();
            assert_eq!(props.get::<GaugeStats>().unwrap().substituted, 2);
            out
        };
        assert_eq!(run(3), run(3));
    }
}
