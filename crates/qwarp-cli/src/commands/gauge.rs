//! Gauge command implementation.

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use qwarp_compile::PauliInsertion;

use super::common::{GaugeKind, derived_output, load_circuit, save_circuit};

/// Execute the gauge command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    kind: GaugeKind,
    seed: Option<u64>,
    pauli: bool,
) -> Result<()> {
    eprintln!(
        "{} Applying {:?} gauges to {}",
        style("→").cyan().bold(),
        kind,
        style(input).green()
    );

    let circuit = load_circuit(input)?;
    let transformer = kind.transformer()?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let (mut transformed, stats) = transformer.apply_with_stats(&circuit, &mut rng)?;
    for (name, count) in &stats.by_gauge {
        debug!("gauge {name}: {count}");
    }

    if pauli {
        let insertion = PauliInsertion::new(transformer.target().clone(), None)?;
        transformed = insertion.apply(&transformed, &mut rng)?;
        eprintln!("  Inserted random Pauli pairs before each target");
    }

    eprintln!("{} Substitution complete", style("✓").green().bold());
    eprintln!(
        "  Rewrote {} occurrences, {} -> {} instructions",
        stats.substituted,
        circuit.len(),
        transformed.len()
    );

    let output = output.map_or_else(|| derived_output(input, "gauged"), String::from);
    save_circuit(&transformed, (output != "-").then_some(output.as_str()))?;
    if output != "-" {
        eprintln!("  Output: {}", style(&output).green());
    }

    Ok(())
}
