//! Serializable run configuration.
//!
//! A `RunConfig` captures everything needed to reproduce a batch of trials:
//! session bounds, table rules, trial count and master seed, and where the
//! strategy comes from (a named preset or a saved document). Two identical
//! configs hash to the same run id.

use serde::{Deserialize, Serialize};
use spinlab_core::domain::Chips;
use spinlab_core::engine::TableConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("bankroll must be positive, got {0}")]
    NonPositiveBankroll(Chips),
    #[error("trial count must be at least 1")]
    ZeroTrials,
}

/// Session bounds: what the player walks in with and when they walk away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub bankroll: Chips,
    /// Halt once the bankroll falls to this level. 0 means play to zero.
    #[serde(default)]
    pub stop_loss: Chips,
    /// Halt once the bankroll reaches this level. 0 disables the target.
    #[serde(default)]
    pub take_profit: Chips,
}

/// Trial batch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Independent trials to run. 1 means a single session.
    #[serde(default = "default_trial_count")]
    pub count: u64,
    /// Master seed for the deterministic RNG hierarchy.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
}

fn default_trial_count() -> u64 {
    1
}

fn default_master_seed() -> u64 {
    0
}

impl Default for TrialConfig {
    fn default() -> Self {
        TrialConfig {
            count: default_trial_count(),
            master_seed: default_master_seed(),
        }
    }
}

/// Where the strategy tree comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrategySource {
    /// A built-in preset by name (see `presets::PRESET_NAMES`).
    Preset {
        preset: String,
        /// Base unit stake the preset is built around.
        #[serde(default = "default_unit")]
        unit: Chips,
    },
    /// A saved strategy document on disk.
    File { file: PathBuf },
}

fn default_unit() -> Chips {
    10
}

/// Complete configuration for one batch of simulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub session: SessionConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub trials: TrialConfig,
    pub strategy: StrategySource,
}

impl RunConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let toml_str = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.bankroll <= 0 {
            return Err(ConfigError::NonPositiveBankroll(self.session.bankroll));
        }
        if self.trials.count == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        Ok(())
    }

    /// Deterministic content hash. Two runs with identical configs share a
    /// RunId, so their trial streams are identical too.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[session]
bankroll = 1000
stop_loss = 200
take_profit = 2000

[table]
max_spins = 500
table_min = 1
table_max = 5000

[trials]
count = 100
master_seed = 42

[strategy]
preset = "martingale"
"#;

    #[test]
    fn parses_full_toml() {
        let config = RunConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.session.bankroll, 1000);
        assert_eq!(config.table.max_spins, 500);
        assert_eq!(config.trials.count, 100);
        assert_eq!(
            config.strategy,
            StrategySource::Preset {
                preset: "martingale".into(),
                unit: 10,
            }
        );
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let config = RunConfig::from_toml_str(
            r#"
[session]
bankroll = 500

[strategy]
file = "plans/my-strategy.json"
"#,
        )
        .unwrap();
        assert_eq!(config.session.stop_loss, 0);
        assert_eq!(config.trials.count, 1);
        assert_eq!(config.table, TableConfig::default());
        assert!(matches!(config.strategy, StrategySource::File { .. }));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            RunConfig::from_toml_str("[session]\nbankroll = 0\n[strategy]\npreset = \"flat_red\""),
            Err(ConfigError::NonPositiveBankroll(0))
        ));
        assert!(matches!(
            RunConfig::from_toml_str(
                "[session]\nbankroll = 100\n[trials]\ncount = 0\n[strategy]\npreset = \"flat_red\""
            ),
            Err(ConfigError::ZeroTrials)
        ));
    }

    #[test]
    fn run_id_is_stable_and_content_addressed() {
        let a = RunConfig::from_toml_str(SAMPLE).unwrap();
        let b = RunConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(a.run_id(), b.run_id());

        let mut c = a.clone();
        c.trials.master_seed = 43;
        assert_ne!(a.run_id(), c.run_id());
    }
}
