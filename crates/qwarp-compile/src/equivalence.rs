//! Randomized equivalence checking for gauge transformers.
//!
//! Each trial embeds the target gate in random single-qubit layers, runs
//! the transformer, and compares the two circuits in two ways: the full
//! unitaries up to a global phase, and the output distributions of a random
//! product state. Both checks must pass within the tolerance.
//!
//! A gauge that breaks its contract leaves a spurious factor next to the
//! target. Random `U(θ, φ, λ)` layers fail to hide such a factor with
//! probability well above one half per trial, so the default 20 trials miss
//! a broken gauge with probability below `2^-20`.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use qwarp_ir::{Circuit, Gate, Instruction, MAX_UNITARY_QUBITS, QubitId, StandardGate, Statevector};

use crate::error::{CompileError, CompileResult};
use crate::gauge::GaugeTransformer;

/// Configuration for [`EquivalenceHarness`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Number of independent trials.
    pub trials: usize,
    /// Width of the random circuits.
    pub num_qubits: u32,
    /// Number of random layers, each ending with one target occurrence.
    pub layers: usize,
    /// Largest deviation accepted in either comparison.
    pub tolerance: f64,
    /// Base seed; trial `i` uses `seed + i`.
    pub seed: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            trials: 20,
            num_qubits: 3,
            layers: 4,
            tolerance: 1e-6,
            seed: 0,
        }
    }
}

/// A trial whose circuits disagreed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialFailure {
    /// Trial index.
    pub trial: usize,
    /// Seed the trial ran with.
    pub seed: u64,
    /// Unitary deviation after removing the global phase.
    pub unitary_deviation: f64,
    /// Largest difference between output probabilities.
    pub probability_deviation: f64,
}

impl TrialFailure {
    fn worst(&self) -> f64 {
        self.unitary_deviation.max(self.probability_deviation)
    }
}

/// Outcome of a harness run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessReport {
    /// Number of trials run.
    pub trials: usize,
    /// Trials that failed.
    pub failures: Vec<TrialFailure>,
}

impl HarnessReport {
    /// True if no trial failed.
    pub fn is_equivalent(&self) -> bool {
        self.failures.is_empty()
    }

    /// Largest deviation among failed trials, or 0.
    pub fn worst_deviation(&self) -> f64 {
        self.failures
            .iter()
            .map(TrialFailure::worst)
            .fold(0.0, f64::max)
    }

    /// Turn failures into [`CompileError::EquivalenceViolation`].
    pub fn into_result(self) -> CompileResult<()> {
        if self.is_equivalent() {
            return Ok(());
        }
        Err(CompileError::EquivalenceViolation {
            failed: self.failures.len(),
            trials: self.trials,
            worst: self.worst_deviation(),
        })
    }
}

/// Statistical equivalence checker.
#[derive(Debug, Clone, Default)]
pub struct EquivalenceHarness {
    config: HarnessConfig,
}

impl EquivalenceHarness {
    /// Create a harness, validating the configuration.
    pub fn new(config: HarnessConfig) -> CompileResult<Self> {
        if config.trials == 0 {
            return Err(CompileError::InvalidConfiguration(
                "harness needs at least one trial".into(),
            ));
        }
        if !(2..=MAX_UNITARY_QUBITS).contains(&config.num_qubits) {
            return Err(CompileError::InvalidConfiguration(format!(
                "harness width must be between 2 and {MAX_UNITARY_QUBITS}, got {}",
                config.num_qubits
            )));
        }
        if !(config.tolerance.is_finite() && config.tolerance > 0.0) {
            return Err(CompileError::InvalidConfiguration(format!(
                "tolerance must be positive, got {}",
                config.tolerance
            )));
        }
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run every trial of `transformer` on circuits containing `target`.
    #[instrument(skip_all, fields(target = %target.name(), transformer = %transformer.name()))]
    pub fn check(&self, target: &Gate, transformer: &GaugeTransformer) -> CompileResult<HarnessReport> {
        if target.num_qubits() != 2 {
            return Err(CompileError::ArityMismatch {
                gate_name: target.name().to_string(),
                got: target.num_qubits() as usize,
            });
        }
        if !transformer.target().matches(target) {
            return Err(CompileError::InvalidConfiguration(format!(
                "transformer '{}' does not rewrite '{}'",
                transformer.name(),
                target.name()
            )));
        }

        let mut failures = Vec::new();
        for trial in 0..self.config.trials {
            let seed = self.config.seed.wrapping_add(trial as u64);
            if let Some(failure) = self.run_trial(trial, seed, target, transformer)? {
                warn!(
                    "Trial {} (seed {}) failed: unitary deviation {:.3e}, probability deviation {:.3e}",
                    trial, seed, failure.unitary_deviation, failure.probability_deviation
                );
                failures.push(failure);
            }
        }

        info!(
            "Equivalence check: {} of {} trials failed",
            failures.len(),
            self.config.trials
        );
        Ok(HarnessReport {
            trials: self.config.trials,
            failures,
        })
    }

    fn run_trial(
        &self,
        trial: usize,
        seed: u64,
        target: &Gate,
        transformer: &GaugeTransformer,
    ) -> CompileResult<Option<TrialFailure>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let circuit = self.random_circuit(target, &mut rng)?;
        let transformed = transformer.apply(&circuit, &mut rng)?;

        let unitary_deviation = circuit
            .unitary()?
            .deviation_up_to_global_phase(&transformed.unitary()?);

        let initial = random_product_state(self.config.num_qubits, &mut rng);
        let before = circuit.simulate(initial.clone())?.probabilities();
        let after = transformed.simulate(initial)?.probabilities();
        let probability_deviation = before
            .iter()
            .zip(&after)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);

        debug!(
            "Trial {}: {} -> {} instructions, deviations {:.3e} / {:.3e}",
            trial,
            circuit.len(),
            transformed.len(),
            unitary_deviation,
            probability_deviation
        );

        let tol = self.config.tolerance;
        Ok((unitary_deviation > tol || probability_deviation > tol).then_some(TrialFailure {
            trial,
            seed,
            unitary_deviation,
            probability_deviation,
        }))
    }

    /// A random circuit with `layers` occurrences of `target`, each preceded
    /// by a random `U` on every qubit, followed by one more random layer.
    pub fn random_circuit<R: Rng + ?Sized>(&self, target: &Gate, rng: &mut R) -> CompileResult<Circuit> {
        let n = self.config.num_qubits;
        let mut circuit = Circuit::with_size("harness", n);
        for _ in 0..self.config.layers {
            random_layer(&mut circuit, rng)?;
            let q0 = rng.gen_range(0..n);
            let mut q1 = rng.gen_range(0..n - 1);
            if q1 >= q0 {
                q1 += 1;
            }
            circuit.gate(target.clone(), [QubitId(q0), QubitId(q1)])?;
        }
        random_layer(&mut circuit, rng)?;
        Ok(circuit)
    }
}

fn random_u<R: Rng + ?Sized>(rng: &mut R) -> StandardGate {
    StandardGate::U(
        rng.gen_range(0.0..PI),
        rng.gen_range(0.0..2.0 * PI),
        rng.gen_range(0.0..2.0 * PI),
    )
}

fn random_layer<R: Rng + ?Sized>(circuit: &mut Circuit, rng: &mut R) -> CompileResult<()> {
    for q in 0..circuit.num_qubits() {
        circuit.push(Instruction::single_qubit_gate(random_u(rng), QubitId(q)))?;
    }
    Ok(())
}

fn random_product_state<R: Rng + ?Sized>(num_qubits: u32, rng: &mut R) -> Statevector {
    let mut state = Statevector::new(num_qubits as usize);
    for q in 0..num_qubits {
        state.apply(&Instruction::single_qubit_gate(random_u(rng), QubitId(q)));
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gauge::cz_gauge_transformer;

    #[test]
    fn test_config_validation() {
        assert!(EquivalenceHarness::new(HarnessConfig::default()).is_ok());
        for bad in [
            HarnessConfig { trials: 0, ..HarnessConfig::default() },
            HarnessConfig { num_qubits: 1, ..HarnessConfig::default() },
            HarnessConfig { num_qubits: 40, ..HarnessConfig::default() },
            HarnessConfig { tolerance: 0.0, ..HarnessConfig::default() },
        ] {
            assert!(EquivalenceHarness::new(bad).is_err());
        }
    }

    #[test]
    fn test_random_circuit_shape() {
        let harness = EquivalenceHarness::default();
        let cz = Gate::standard(StandardGate::CZ);
        let mut rng = StdRng::seed_from_u64(4);
        let circuit = harness.random_circuit(&cz, &mut rng).unwrap();
        assert_eq!(circuit.count_ops()["cz"], 4);
        assert_eq!(circuit.count_ops()["u"], 5 * 3);
        for inst in circuit.iter().filter(|i| i.name() == "cz") {
            assert_ne!(inst.qubits[0], inst.qubits[1]);
        }
    }

    #[test]
    fn test_default_config() {
        let config = EquivalenceHarness::default().config().clone();
        assert_eq!(config.trials, 20);
        assert_eq!(config.tolerance, 1e-6);
        let parsed: HarnessConfig = serde_json::from_str(r#"{"trials": 5}"#).unwrap();
        assert_eq!(parsed.trials, 5);
        assert_eq!(parsed.num_qubits, 3);
    }

    #[test]
    fn test_rejects_unmatched_target() {
        let harness = EquivalenceHarness::default();
        let transformer = cz_gauge_transformer().unwrap();
        let err = harness
            .check(&Gate::standard(StandardGate::CX), &transformer)
            .unwrap_err();
        assert!(matches!(err, CompileError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_report_into_result() {
        let ok = HarnessReport { trials: 3, failures: vec![] };
        assert!(ok.into_result().is_ok());

        let bad = HarnessReport {
            trials: 3,
            failures: vec![TrialFailure {
                trial: 1,
                seed: 1,
                unitary_deviation: 0.5,
                probability_deviation: 0.1,
            }],
        };
        assert_eq!(bad.worst_deviation(), 0.5);
        assert!(matches!(
            bad.into_result(),
            Err(CompileError::EquivalenceViolation { failed: 1, trials: 3, .. })
        ));
    }
}
