use clap::Parser;
use golden_step::adapters::{
    ExpectationSimulator, NativeLibrary, RepoStatusChecker, SkippedStatusCheck, UnavailableQuantum,
};
use golden_step::domain::ports::{QuantumBackend, StatusChecker};
use golden_step::utils::error::ErrorSeverity;
use golden_step::utils::{logger, validation::Validate};
use golden_step::{
    fib_sequence, is_fibonacci, predict_usage, CliConfig, CodeGenerator, Command, DigestMode,
    LoreError, LoreNode, NodeConfig, RatioPlanner,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = execute(&cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn execute(cli: &CliConfig) -> Result<(), LoreError> {
    let config = cli.node_config()?;
    config.validate()?;

    match &cli.command {
        Command::Run { .. } => run_node(config).await,
        Command::Code {
            seed,
            length,
            extend,
        } => {
            let mode = if *extend {
                DigestMode::Extended
            } else {
                config.digest_mode()
            };
            let code = CodeGenerator::new(mode)
                .generate(seed, length.unwrap_or(config.product.code_length))?;
            println!("{}", code);
            Ok(())
        }
        Command::Plan { base_unit } => {
            let planner = RatioPlanner::with_fib_terms(config.ratios.fib_terms)?;
            let plan = planner.build_plan(base_unit.unwrap_or(config.ratios.base_unit))?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Command::Snap { query, base_unit } => {
            let planner = RatioPlanner::with_fib_terms(config.ratios.fib_terms)?;
            let snapped = planner.snap(base_unit.unwrap_or(config.ratios.base_unit), *query)?;
            println!("{}", snapped);
            Ok(())
        }
        Command::Fib { terms } => {
            println!("{}", serde_json::to_string(&fib_sequence(*terms)?)?);
            Ok(())
        }
        Command::IsFib { value } => {
            println!("{}", is_fibonacci(*value));
            Ok(())
        }
        Command::Usage { hour } => {
            println!("{}", predict_usage(*hour));
            Ok(())
        }
    }
}

async fn run_node(config: NodeConfig) -> Result<(), LoreError> {
    tracing::info!("🚀 Starting golden-step node");

    let status: Box<dyn StatusChecker> = if config.repository.enabled {
        Box::new(RepoStatusChecker::new(
            config.repository.api_url.clone(),
            config.repository_timeout(),
        )?)
    } else {
        Box::new(SkippedStatusCheck)
    };

    let native = if config.native.enabled {
        NativeLibrary::load(
            &config.native.library_dir,
            &config.native.windows_name,
            &config.native.unix_name,
        )
    } else {
        NativeLibrary::unavailable(PathBuf::from(&config.native.library_dir))
    };

    let quantum: Box<dyn QuantumBackend> = if config.quantum.enabled {
        Box::new(ExpectationSimulator::new(config.quantum.shots))
    } else {
        Box::new(UnavailableQuantum)
    };

    let node = LoreNode::new(config, status, native, quantum)?;
    let report = node.run().await?;

    tracing::info!("✅ Node run completed");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
