use crate::config::toml_config::NodeConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "golden-step")]
#[command(about = "Deterministic Fibonacci barcodes and golden-ratio scaling")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Run the full node and print its JSON report
    Run {
        /// Skip the repository status check
        #[arg(long)]
        no_repo: bool,

        /// Run the quantum pulse with the built-in simulator
        #[arg(long)]
        quantum: bool,
    },

    /// Derive the digit code for a seed
    Code {
        seed: String,

        #[arg(short, long)]
        length: Option<usize>,

        /// Allow codes longer than 32 digits
        #[arg(long)]
        extend: bool,
    },

    /// Print the ratio plan for a base unit
    Plan {
        #[arg(long)]
        base_unit: Option<f64>,
    },

    /// Snap a value to the nearest proportional length
    Snap {
        #[arg(allow_negative_numbers = true)]
        query: f64,

        #[arg(long)]
        base_unit: Option<f64>,
    },

    /// Print the first N Fibonacci numbers
    Fib { terms: usize },

    /// Check whether a number is a Fibonacci number
    IsFib { value: u64 },

    /// Predict DNS usage for an hour of the day
    Usage {
        #[arg(allow_negative_numbers = true)]
        hour: i64,
    },
}

impl CliConfig {
    /// Config file if one was given, defaults otherwise, with `run` flags applied.
    pub fn node_config(&self) -> Result<NodeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                NodeConfig::from_file(path)?
            }
            None => NodeConfig::default(),
        };

        if let Command::Run { no_repo, quantum } = self.command {
            if no_repo {
                config.repository.enabled = false;
                tracing::info!("🔧 Repository check disabled from command line");
            }
            if quantum {
                config.quantum.enabled = true;
                tracing::info!("🔧 Quantum pulse enabled from command line");
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_code_command() {
        let cli = CliConfig::try_parse_from(["golden-step", "code", "Sparsity Rock", "-l", "12"])
            .unwrap();
        assert_eq!(
            cli.command,
            Command::Code {
                seed: "Sparsity Rock".to_string(),
                length: Some(12),
                extend: false,
            }
        );
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_snap_with_global_flags() {
        let cli = CliConfig::try_parse_from([
            "golden-step",
            "snap",
            "-2.5",
            "--base-unit",
            "0.5",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Command::Snap {
                query: -2.5,
                base_unit: Some(0.5),
            }
        );
    }

    #[test]
    fn test_run_flags_override_config() {
        let cli = CliConfig::try_parse_from(["golden-step", "run", "--no-repo", "--quantum"])
            .unwrap();
        let config = cli.node_config().unwrap();
        assert!(!config.repository.enabled);
        assert!(config.quantum.enabled);
    }

    #[test]
    fn test_missing_config_file_is_io_error() {
        let cli = CliConfig::try_parse_from([
            "golden-step",
            "--config",
            "/definitely/not/here.toml",
            "fib",
            "5",
        ])
        .unwrap();
        assert!(matches!(
            cli.node_config(),
            Err(crate::utils::error::LoreError::IoError(_))
        ));
    }
}
