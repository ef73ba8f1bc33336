//! Reorder command implementation.

use anyhow::Result;
use console::style;

use qwarp_compile::passes::{CommutationRule, ReorderConfig, reorder_with_stats};

use super::common::{derived_output, load_circuit, load_config, save_circuit};

/// Execute the reorder command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    config_path: Option<&str>,
    rule: Option<CommutationRule>,
    mask_threshold: Option<usize>,
) -> Result<()> {
    eprintln!(
        "{} Reordering {}",
        style("→").cyan().bold(),
        style(input).green()
    );

    let circuit = load_circuit(input)?;
    eprintln!(
        "  Loaded: {} qubits, {} instructions, depth {}",
        circuit.num_qubits(),
        circuit.len(),
        circuit.depth()
    );

    let mut config: ReorderConfig = load_config(config_path)?;
    if let Some(rule) = rule {
        config.commutation = rule;
    }
    if let Some(threshold) = mask_threshold {
        config.mask_threshold = threshold;
    }

    let (reordered, stats) = reorder_with_stats(&circuit, &config)?;

    eprintln!("{} Reordering complete", style("✓").green().bold());
    eprintln!(
        "  Moved {} of {} instructions, depth {} -> {}",
        stats.moved, stats.instructions, stats.depth_before, stats.depth_after
    );

    let output = output.map_or_else(|| derived_output(input, "reordered"), String::from);
    save_circuit(&reordered, (output != "-").then_some(output.as_str()))?;
    if output != "-" {
        eprintln!("  Output: {}", style(&output).green());
    }

    Ok(())
}
