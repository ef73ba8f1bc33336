//! Verify command implementation.

use anyhow::Result;
use console::style;

use qwarp_compile::{EquivalenceHarness, HarnessConfig};

use super::common::{GaugeKind, load_config};

/// Execute the verify command.
pub fn execute(
    kind: GaugeKind,
    config_path: Option<&str>,
    trials: Option<usize>,
    seed: Option<u64>,
    angle: f64,
) -> Result<()> {
    let mut config: HarnessConfig = load_config(config_path)?;
    if let Some(trials) = trials {
        config.trials = trials;
    }
    if let Some(seed) = seed {
        config.seed = seed;
    }

    println!(
        "{} Verifying {:?} gauges ({} trials, tolerance {:.0e})",
        style("→").cyan().bold(),
        kind,
        config.trials,
        config.tolerance
    );

    let harness = EquivalenceHarness::new(config)?;
    let transformer = kind.transformer()?;

    let mut failed = false;
    for target in kind.verification_targets(angle) {
        let report = harness.check(&target, &transformer)?;
        if report.is_equivalent() {
            println!(
                "  {} {:?}: {} trials passed",
                style("✓").green().bold(),
                target.kind,
                report.trials
            );
        } else {
            failed = true;
            println!(
                "  {} {:?}: {} of {} trials failed (worst deviation {:.3e})",
                style("✗").red().bold(),
                target.kind,
                report.failures.len(),
                report.trials,
                report.worst_deviation()
            );
        }
    }

    if failed {
        anyhow::bail!("gauge set is not equivalence-preserving");
    }
    Ok(())
}
