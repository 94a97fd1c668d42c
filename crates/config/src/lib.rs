//! Configuration parsing and validation for the simulated exchange
//!
//! The simulation core takes exactly four inputs at construction time
//! (cycle delay, starting balances, and the wrapped exchange handle).
//! This crate loads the first three from a small YAML file; the exchange
//! handle itself is wired in code by the binary that embeds `sim-core`.

use anyhow::{Context, Result};
use common::Amount;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

pub mod defaults;
pub mod validator;

pub use validator::{validate_config, DefaultApplied, ValidationError, ValidationReport, ValidationWarning};

/// Configuration accepted by [`sim_core::Sim::new`](../sim_core/struct.Sim.html).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SimConfig {
    /// Sleep between matching cycles, in milliseconds.
    #[serde(default = "defaults::default_cycle_delay_ms")]
    pub cycle_delay_ms: u64,
    /// Initial currency endowment.
    pub currency_balance: Amount,
    /// Initial commodity endowment.
    pub commodity_balance: Amount,
}

impl SimConfig {
    /// Convenience constructor used by tests and the demo binary.
    pub fn new(cycle_delay_ms: u64, currency_balance: Amount, commodity_balance: Amount) -> Self {
        Self {
            cycle_delay_ms,
            currency_balance,
            commodity_balance,
        }
    }
}

/// Loads a [`SimConfig`] from a YAML file.
#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    debug!("Config file content length: {} bytes", content.len());

    let config: SimConfig =
        serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML configuration")?;

    info!("Configuration loaded successfully");
    Ok(config)
}

/// Saves a [`SimConfig`] to a YAML file.
#[instrument(skip(config))]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &SimConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;
    fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

/// A reasonable starting point for `simx init`.
pub fn generate_default_config() -> SimConfig {
    SimConfig {
        cycle_delay_ms: defaults::default_cycle_delay_ms(),
        currency_balance: Amount::new(10_000, 0),
        commodity_balance: Amount::new(0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generate_default_config_is_valid() {
        let config = generate_default_config();
        let report = validate_config(&config);
        assert!(report.is_valid());
    }

    #[test]
    fn test_round_trip_via_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let config = SimConfig::new(500, Amount::new(1000, 0), Amount::new(5, 0));
        let yaml = serde_yaml::to_string(&config).unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = load_config(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_cycle_delay_defaults() {
        let yaml = "currency_balance: \"100\"\ncommodity_balance: \"0\"\n";
        let config: SimConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.cycle_delay_ms, defaults::default_cycle_delay_ms());
    }
}
