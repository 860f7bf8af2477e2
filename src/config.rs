//! YAML configuration (§4.K, §6). Ambient to the accounting core, but a
//! complete runnable repository needs a typed way to drive it.

use std::{collections::HashMap, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, lot::LotConfig, model::{Currency, CurrencyPair, event::EventKind}};

fn default_reporting_currency() -> Currency {
    Currency::new("USD").expect("USD is a valid currency symbol")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub directory: PathBuf,
    pub files: HashMap<EventKind, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsConfig {
    pub directory: PathBuf,
    #[serde(default = "default_audit_log")]
    pub audit_log: String,
    #[serde(default = "default_snapshots")]
    pub snapshots: String,
    #[serde(default = "default_final_state")]
    pub final_state: String,
}

fn default_audit_log() -> String {
    "audit_log.ndjson".to_string()
}

fn default_snapshots() -> String {
    "snapshots.parquet".to_string()
}

fn default_final_state() -> String {
    "final_state.json".to_string()
}

/// Top-level typed configuration, deserialized from the `run --config`
/// YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub inputs: InputsConfig,
    pub outputs: OutputsConfig,
    #[serde(default = "default_reporting_currency")]
    pub reporting_currency: Currency,
    #[serde(default)]
    pub lot_tracking: Option<LotConfig>,
}

impl SimConfig {
    /// Loads and validates a config file, resolving `inputs.directory` and
    /// `outputs.directory` relative to the config file's own parent
    /// directory when they are themselves relative paths.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: SimConfig = serde_yaml::from_str(&raw)?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.inputs.directory = resolve(base_dir, &config.inputs.directory);
        config.outputs.directory = resolve(base_dir, &config.outputs.directory);

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(lot_config) = &self.lot_tracking {
            lot_config.validate()?;
            if lot_config.reporting_currency != self.reporting_currency {
                return Err(ConfigError::Invalid(format!(
                    "lot_tracking.reporting_currency ({}) must match the top-level reporting_currency ({})",
                    lot_config.reporting_currency, self.reporting_currency
                )));
            }
        }
        Ok(())
    }

    pub fn input_path(&self, kind: EventKind) -> Option<PathBuf> {
        self.inputs
            .files
            .get(&kind)
            .map(|name| self.inputs.directory.join(name))
    }

    pub fn audit_log_path(&self) -> PathBuf {
        self.outputs.directory.join(&self.outputs.audit_log)
    }

    pub fn snapshots_path(&self) -> PathBuf {
        self.outputs.directory.join(&self.outputs.snapshots)
    }

    pub fn final_state_path(&self) -> PathBuf {
        self.outputs.directory.join(&self.outputs.final_state)
    }
}

fn resolve(base_dir: &Path, candidate: &Path) -> PathBuf {
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    }
}

/// Configured risk pairs as a plain list, used by sample-data generation and
/// tests without needing the full `LotConfig`.
pub fn configured_risk_pairs(config: &SimConfig) -> Vec<CurrencyPair> {
    config
        .lot_tracking
        .as_ref()
        .map(|c| c.risk_pairs.clone())
        .unwrap_or_default()
}
