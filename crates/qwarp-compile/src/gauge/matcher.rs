//! Target gate matching.

use serde::{Deserialize, Serialize};

use qwarp_ir::Gate;

/// Which gates a transformer rewrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMatcher {
    /// One gate, parameters included. Labels are ignored.
    Exact(Gate),
    /// Every gate with this name, e.g. `"cp"` for all controlled phases.
    Named(String),
    /// Any of several matchers.
    AnyOf(Vec<TargetMatcher>),
}

impl TargetMatcher {
    /// Check whether `gate` is a target.
    pub fn matches(&self, gate: &Gate) -> bool {
        match self {
            TargetMatcher::Exact(target) => target.kind == gate.kind,
            TargetMatcher::Named(name) => gate.name() == name,
            TargetMatcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(gate)),
        }
    }

    /// The gates this matcher can enumerate for validation.
    ///
    /// Named families have no representatives of their own.
    pub fn representatives(&self) -> Vec<Gate> {
        match self {
            TargetMatcher::Exact(target) => vec![target.clone()],
            TargetMatcher::Named(_) => vec![],
            TargetMatcher::AnyOf(matchers) => {
                matchers.iter().flat_map(TargetMatcher::representatives).collect()
            }
        }
    }
}

impl From<Gate> for TargetMatcher {
    fn from(gate: Gate) -> Self {
        TargetMatcher::Exact(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qwarp_ir::StandardGate;

    #[test]
    fn test_exact_ignores_label() {
        let m = TargetMatcher::Exact(StandardGate::CZ.into());
        assert!(m.matches(&Gate::standard(StandardGate::CZ).with_label("calibrated")));
        assert!(!m.matches(&StandardGate::CX.into()));
        assert!(!TargetMatcher::Exact(StandardGate::CZPow(0.5).into())
            .matches(&StandardGate::CZPow(-0.5).into()));
    }

    #[test]
    fn test_named_and_any_of() {
        let m = TargetMatcher::AnyOf(vec![
            TargetMatcher::Named("cp".into()),
            TargetMatcher::Exact(StandardGate::CZ.into()),
        ]);
        assert!(m.matches(&StandardGate::CP(0.3).into()));
        assert!(m.matches(&StandardGate::CZ.into()));
        assert!(!m.matches(&StandardGate::Swap.into()));
        assert_eq!(m.representatives(), vec![Gate::standard(StandardGate::CZ)]);
    }
}
