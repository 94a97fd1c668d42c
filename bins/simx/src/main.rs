//! Demo CLI and entry point for the simulated spot-trading exchange
//! adapter.
//!
//! Provides commands for generating a starting configuration, validating
//! one, and running the simulation against a fixed reference exchange
//! fixture until Ctrl+C.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{generate_default_config, load_config, save_config, validate_config};
use observability::{init_logging, LogFormat};
use rust_decimal_macros::dec;
use sim_core::{paper, Sim, Spot};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "simx")]
#[command(about = "Simulated spot-trading exchange adapter")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the simulation against the reference fixture until Ctrl+C.
    Run {
        /// Path to the configuration file.
        #[arg(short, long, default_value = "simx.yaml")]
        config: PathBuf,
    },
    /// Validate a configuration file without starting the simulation.
    Validate {
        /// Path to the configuration file.
        #[arg(short, long, default_value = "simx.yaml")]
        config: PathBuf,
    },
    /// Write a configuration file populated with defaults.
    Init {
        /// Output path for the new configuration file.
        #[arg(short, long, default_value = "simx.yaml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("simx", LogFormat::Pretty)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => run_command(config).await,
        Commands::Validate { config } => validate_command(config),
        Commands::Init { output } => init_command(output),
    }
}

async fn run_command(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)
        .with_context(|| format!("failed to load configuration from {:?}", config_path))?;
    let report = validate_config(&config);

    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("cannot start simulation due to configuration errors");
    }
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message);
    }

    info!(
        cycle_delay_ms = config.cycle_delay_ms,
        currency_balance = %config.currency_balance,
        commodity_balance = %config.commodity_balance,
        "starting simulation"
    );

    let exchange = paper::default_fixture();
    let sim = Sim::new(
        config.currency_balance,
        config.commodity_balance,
        config.cycle_delay_ms,
        exchange,
    );

    // Place one demo limit buy so there's something for the runner to
    // work through while the process is up.
    let order_id = sim
        .place_limit_order(common::Side::Bid, dec!(1), dec!(100))
        .await?;
    info!(%order_id, "placed demo limit order");

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!("shutting down");

    let balances = sim.balances();
    println!("final balances: currency={} commodity={}", balances.currency, balances.commodity);

    Ok(())
}

fn validate_command(config_path: PathBuf) -> Result<()> {
    let config = load_config(&config_path)
        .with_context(|| format!("failed to load configuration from {:?}", config_path))?;
    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("configuration validation failed");
    }

    println!("[ok] configuration is valid");
    println!("cycle_delay_ms: {}", config.cycle_delay_ms);
    println!("currency_balance: {}", config.currency_balance);
    println!("commodity_balance: {}", config.commodity_balance);

    Ok(())
}

fn init_command(output_path: PathBuf) -> Result<()> {
    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, &output_path)?;

    println!("[ok] configuration file created at {:?}", output_path);
    println!("run `simx validate --config {:?}` to check it", output_path);
    println!("run `simx run --config {:?}` to start the simulation", output_path);

    Ok(())
}
