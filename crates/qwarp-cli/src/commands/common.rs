//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::de::DeserializeOwned;

use qwarp_compile::gauge::{
    GaugeTransformer, cphase_gauge_transformer, cz_gauge_transformer, sqrt_cz_gauge_transformer,
};
use qwarp_ir::{Circuit, Gate, StandardGate};

/// Built-in gauge sets selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GaugeKind {
    /// Pauli gauges for CZ
    Cz,
    /// Gauges for CZ^0.5 and CZ^-0.5
    SqrtCz,
    /// X/Z frame gauges for CP(θ)
    Cphase,
}

impl GaugeKind {
    /// Build the transformer.
    pub fn transformer(self) -> Result<GaugeTransformer> {
        let transformer = match self {
            GaugeKind::Cz => cz_gauge_transformer(),
            GaugeKind::SqrtCz => sqrt_cz_gauge_transformer(),
            GaugeKind::Cphase => cphase_gauge_transformer(),
        };
        transformer.context("Failed to build gauge transformer")
    }

    /// Target gates to verify against. `angle` parameterizes the CPhase family.
    pub fn verification_targets(self, angle: f64) -> Vec<Gate> {
        match self {
            GaugeKind::Cz => vec![StandardGate::CZ.into()],
            GaugeKind::SqrtCz => vec![StandardGate::CZPow(0.5).into(), StandardGate::CZPow(-0.5).into()],
            GaugeKind::Cphase => vec![StandardGate::CP(angle).into()],
        }
    }
}

/// Load a circuit from a JSON file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let source = fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    serde_json::from_str(&source).with_context(|| format!("Invalid circuit JSON in {path}"))
}

/// Write a circuit as pretty JSON, or to stdout when `path` is `None`.
pub fn save_circuit(circuit: &Circuit, path: Option<&str>) -> Result<()> {
    let content = serde_json::to_string_pretty(circuit).context("Failed to serialize circuit")?;
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write file: {path}"))?;
        }
        None => println!("{content}"),
    }
    Ok(())
}

/// Load a JSON configuration file, or the default when no path is given.
pub fn load_config<T: DeserializeOwned + Default>(path: Option<&str>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;
    serde_json::from_str(&source).with_context(|| format!("Invalid config JSON in {path}"))
}

/// Default output path: `<stem>_<suffix>.json` next to the input.
pub fn derived_output(input: &str, suffix: &str) -> String {
    let p = Path::new(input);
    let stem = p.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{stem}_{suffix}.json");
    match p.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => dir.join(name).to_string_lossy().into_owned(),
        None => name,
    }
}
