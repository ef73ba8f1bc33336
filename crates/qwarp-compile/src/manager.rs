//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qwarp_ir::Circuit;

use crate::error::CompileResult;
use crate::gauge::GaugeTransformer;
use crate::pass::Pass;
use crate::passes::{CommutationReorder, PauliInsertion, ReorderConfig};
use crate::property::PropertySet;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes, returning the final circuit.
    #[instrument(skip(self, circuit, properties), fields(circuit = %circuit.name()))]
    pub fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            circuit.num_qubits()
        );

        let mut current = circuit.clone();
        for pass in &self.passes {
            if pass.should_run(&current, properties) {
                debug!("Running pass: {}", pass.name());
                current = pass.run(&current, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), current.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final depth: {}, ops: {}",
            current.depth(),
            current.len()
        );

        Ok(current)
    }

    /// Names of the passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for assembling a pipeline.
///
/// Passes run in a fixed order: reordering, then gauge substitution, then
/// Pauli insertion. Each is optional.
#[derive(Default)]
pub struct PassManagerBuilder {
    reorder: Option<ReorderConfig>,
    gauge: Option<GaugeTransformer>,
    pauli: Option<PauliInsertion>,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with no passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add commutation-aware reordering.
    #[must_use]
    pub fn with_reordering(mut self, config: ReorderConfig) -> Self {
        self.reorder = Some(config);
        self
    }

    /// Add gauge substitution.
    #[must_use]
    pub fn with_gauge(mut self, transformer: GaugeTransformer) -> Self {
        self.gauge = Some(transformer);
        self
    }

    /// Add Pauli insertion.
    #[must_use]
    pub fn with_pauli_insertion(mut self, pass: PauliInsertion) -> Self {
        self.pauli = Some(pass);
        self
    }

    /// Seed randomized passes.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.properties.seed = Some(seed);
        self
    }

    /// Start from the given properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();
        if let Some(config) = self.reorder {
            pm.add_pass(CommutationReorder::new(config));
        }
        if let Some(gauge) = self.gauge {
            pm.add_pass(gauge);
        }
        if let Some(pauli) = self.pauli {
            pm.add_pass(pauli);
        }
        (pm, self.properties)
    }
}
