//! Breakdance - Entry point

use std::process::ExitCode;

use anyhow::{Context, Result};
use breakdance_cli::{Args, Command};
use breakdance_config::{BreakdanceConfig, ConfigLoader, DEFAULT_ENV_PREFIX};
use breakdance_telemetry::{init_logging, metrics::describe_metrics, LogConfig};
use tracing::error;

fn load_config(args: &Args) -> Result<BreakdanceConfig> {
    let mut loader = ConfigLoader::new()
        .with_dotenv()?
        .with_env_prefix(DEFAULT_ENV_PREFIX);
    if let Some(path) = &args.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    }
    Ok(loader.load()?)
}

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("Use --help for usage information");
            return ExitCode::from(2);
        }
    };

    let config = if matches!(args.command, Command::Help | Command::Version) {
        BreakdanceConfig::default()
    } else {
        match load_config(&args) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Invalid configuration: {e:#}");
                return ExitCode::from(2);
            }
        }
    };

    if let Err(e) = init_logging(&LogConfig::from(&config.logging)) {
        eprintln!("Failed to initialize logging: {e}");
    }
    describe_metrics();

    let mut stdout = std::io::stdout().lock();
    match breakdance_cli::run(&args.command, &config, &mut stdout) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
