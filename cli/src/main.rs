//! Charter command line: inspect configs and dry-run proposal scenarios.

mod scenario;

use anyhow::Context;
use charter_governance::GovernanceConfig;
use charter_utils::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "charter", about = "Weighted governance over an agent's instruction text")]
struct Cli {
    /// Path to a TOML governance config. Defaults apply when omitted.
    #[arg(long, global = true, env = "CHARTER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Overrides the config file; `RUST_LOG` overrides both.
    #[arg(long, global = true, env = "CHARTER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json". Overrides the config file.
    #[arg(long, global = true, env = "CHARTER_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Work with governance config files.
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Run a scenario file against in-memory collaborators and print every event.
    #[command(name = "simulate")]
    Simulate {
        /// Scenario TOML describing weights and steps.
        scenario: PathBuf,

        /// Stop at the first rejected step instead of reporting it and continuing.
        #[arg(long)]
        strict: bool,
    },
}

#[derive(clap::Subcommand)]
enum ConfigAction {
    /// Print the default config as TOML.
    Default,
    /// Validate the config given with --config and print the parameters it yields.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GovernanceConfig> {
    match path {
        Some(path) => GovernanceConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GovernanceConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    let format = cli.log_format.unwrap_or(config.log_format);
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    charter_utils::init_logging(format, level);

    match cli.command {
        Command::Config {
            action: ConfigAction::Default,
        } => {
            print!("{}", GovernanceConfig::default().to_toml_string()?);
        }
        Command::Config {
            action: ConfigAction::Check,
        } => {
            config.validate()?;
            let params = config.parameters()?;
            tracing::info!("config is valid");
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        Command::Simulate { scenario, strict } => {
            config.validate()?;
            let scenario = scenario::Scenario::from_toml_file(&scenario)?;
            let report = scenario::run(&config, &scenario, strict, |line| println!("{line}"))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
