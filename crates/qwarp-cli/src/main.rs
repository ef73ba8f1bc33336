//! Qwarp Command-Line Interface
//!
//! The main entry point for the `qwarp` tool. Circuits are read and written
//! as JSON.

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::GaugeKind;
use commands::{gauge, reorder, verify, version};
use qwarp_compile::CommutationRule;

/// Qwarp - commutation-aware reordering and gauge compilation
#[derive(Parser)]
#[command(name = "qwarp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Commutation rule for the reorder command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RuleArg {
    /// Only disjoint instructions commute
    Operands,
    /// Overlapping instructions commute if their matrices do
    Unitary,
}

impl From<RuleArg> for CommutationRule {
    fn from(rule: RuleArg) -> Self {
        match rule {
            RuleArg::Operands => CommutationRule::Operands,
            RuleArg::Unitary => CommutationRule::Unitary,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Reorder a circuit, moving commuting instructions earlier
    Reorder {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Reorder configuration (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Commutation rule (overrides the config file)
        #[arg(long, value_enum)]
        rule: Option<RuleArg>,

        /// Largest qubit count for the bitmask fast path
        #[arg(long)]
        mask_threshold: Option<usize>,
    },

    /// Replace target gates with randomly chosen gauges
    Gauge {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file ("-" for stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Gauge set
        #[arg(short, long, value_enum, default_value = "cz")]
        gauge: GaugeKind,

        /// RNG seed
        #[arg(short, long, env = "QWARP_SEED")]
        seed: Option<u64>,

        /// Also insert random Pauli pairs before each target
        #[arg(long)]
        pauli: bool,
    },

    /// Statistically verify that a gauge set preserves circuit semantics
    Verify {
        /// Gauge set
        #[arg(short, long, value_enum, default_value = "cz")]
        gauge: GaugeKind,

        /// Harness configuration (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Number of trials (overrides the config file)
        #[arg(short, long)]
        trials: Option<usize>,

        /// Base seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Angle of the CP target for the cphase gauge set
        #[arg(long, default_value_t = std::f64::consts::FRAC_PI_4, allow_negative_numbers = true)]
        angle: f64,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Reorder {
            input,
            output,
            config,
            rule,
            mask_threshold,
        } => reorder::execute(
            &input,
            output.as_deref(),
            config.as_deref(),
            rule.map(CommutationRule::from),
            mask_threshold,
        ),

        Commands::Gauge {
            input,
            output,
            gauge: kind,
            seed,
            pauli,
        } => gauge::execute(&input, output.as_deref(), kind, seed, pauli),

        Commands::Verify {
            gauge: kind,
            config,
            trials,
            seed,
            angle,
        } => verify::execute(kind, config.as_deref(), trials, seed, angle),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reorder_minimal() {
        let cli = Cli::try_parse_from(["qwarp", "reorder", "-i", "c.json"]).unwrap();
        match cli.command {
            Commands::Reorder {
                input,
                output,
                rule,
                mask_threshold,
                ..
            } => {
                assert_eq!(input, "c.json");
                assert!(output.is_none());
                assert!(rule.is_none());
                assert!(mask_threshold.is_none());
            }
            _ => panic!("expected reorder"),
        }
    }

    #[test]
    fn test_parse_reorder_rule() {
        let cli = Cli::try_parse_from([
            "qwarp",
            "reorder",
            "-i",
            "c.json",
            "--rule",
            "unitary",
            "--mask-threshold",
            "1",
        ])
        .unwrap();
        match cli.command {
            Commands::Reorder {
                rule, mask_threshold, ..
            } => {
                assert_eq!(rule.map(CommutationRule::from), Some(CommutationRule::Unitary));
                assert_eq!(mask_threshold, Some(1));
            }
            _ => panic!("expected reorder"),
        }
    }

    #[test]
    fn test_parse_gauge_defaults() {
        let cli = Cli::try_parse_from(["qwarp", "gauge", "-i", "c.json", "--seed", "3"]).unwrap();
        match cli.command {
            Commands::Gauge {
                gauge, seed, pauli, ..
            } => {
                assert_eq!(gauge, GaugeKind::Cz);
                assert_eq!(seed, Some(3));
                assert!(!pauli);
            }
            _ => panic!("expected gauge"),
        }
    }

    #[test]
    fn test_parse_gauge_kind() {
        let cli =
            Cli::try_parse_from(["qwarp", "gauge", "-i", "c.json", "-g", "sqrt-cz", "--pauli"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Gauge {
                gauge: GaugeKind::SqrtCz,
                pauli: true,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["qwarp", "gauge", "-i", "c.json", "-g", "iswap"]).is_err());
    }

    #[test]
    fn test_parse_verify() {
        let cli = Cli::try_parse_from([
            "qwarp", "verify", "-g", "cphase", "--angle", "-0.7", "-t", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Verify {
                gauge,
                trials,
                angle,
                ..
            } => {
                assert_eq!(gauge, GaugeKind::Cphase);
                assert_eq!(trials, Some(5));
                assert!((angle + 0.7).abs() < 1e-12);
            }
            _ => panic!("expected verify"),
        }
    }

    #[test]
    fn test_parse_missing_input() {
        assert!(Cli::try_parse_from(["qwarp", "reorder"]).is_err());
    }

    #[test]
    fn test_verbosity_count() {
        let cli = Cli::try_parse_from(["qwarp", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
