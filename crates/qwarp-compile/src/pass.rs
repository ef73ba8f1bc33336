//! Pass trait and types for compilation passes.

use qwarp_ir::Circuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads the circuit and writes properties only.
    Analysis,
    /// Transformation pass that produces a new circuit.
    Transformation,
}

/// A compilation pass over a circuit.
///
/// Passes never mutate their input: a pass returns the circuit the next
/// pass should see. Analysis passes return a clone of their input.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given circuit.
    ///
    /// Passes may read and write the `PropertySet`; randomized passes take
    /// their generator from [`PropertySet::rng`].
    fn run(&self, circuit: &Circuit, properties: &mut PropertySet) -> CompileResult<Circuit>;

    /// Check if this pass should run based on current state.
    ///
    /// This can be overridden to skip passes that are not needed.
    fn should_run(&self, _circuit: &Circuit, _properties: &PropertySet) -> bool {
        true
    }
}
