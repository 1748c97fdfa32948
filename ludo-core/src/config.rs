//! Engine configuration: pacing of the timed sequences and the chance mode.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::dice::ChanceMode;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Timed-sequence pacing.
    #[serde(default)]
    pub pacing: PacingConfig,
    /// Dice chance mode.
    #[serde(default)]
    pub chance: ChanceConfig,
}

/// Delays of the three timed sequences, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PacingConfig {
    /// Dice presentation length before the rolled value is committed.
    #[serde(default = "default_roll_presentation_ms")]
    pub roll_presentation_ms: u64,
    /// One movement quantum (one discrete piece step).
    #[serde(default = "default_move_step_ms")]
    pub move_step_ms: u64,
    /// Pause before the turn transfers, so the outcome stays visible.
    #[serde(default = "default_handover_delay_ms")]
    pub handover_delay_ms: u64,
}

fn default_roll_presentation_ms() -> u64 {
    650
}

fn default_move_step_ms() -> u64 {
    260
}

fn default_handover_delay_ms() -> u64 {
    850
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            roll_presentation_ms: default_roll_presentation_ms(),
            move_step_ms: default_move_step_ms(),
            handover_delay_ms: default_handover_delay_ms(),
        }
    }
}

/// Chance-mode selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChanceConfig {
    /// Deterministic, event-keyed dice stream.
    EventKeyed { seed: u64 },
    /// Pseudorandom dice stream backed by a seeded PRNG.
    Rng { seed: u64 },
}

impl Default for ChanceConfig {
    fn default() -> Self {
        ChanceConfig::Rng { seed: 0 }
    }
}

impl ChanceConfig {
    pub fn to_mode(&self) -> ChanceMode {
        match *self {
            ChanceConfig::EventKeyed { seed } => ChanceMode::new_event_keyed(seed),
            ChanceConfig::Rng { seed } => ChanceMode::new_rng(seed),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pacing: PacingConfig::default(),
            chance: ChanceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pacing.roll_presentation_ms, 650);
        assert_eq!(config.pacing.move_step_ms, 260);
        assert_eq!(config.pacing.handover_delay_ms, 850);
        assert!(matches!(config.chance, ChanceConfig::Rng { seed: 0 }));
    }

    #[test]
    fn test_parse_yaml_string() {
        let yaml = r#"
pacing:
  move_step_ms: 10
chance:
  kind: event_keyed
  seed: 42
"#;
        let config = Config::from_yaml(yaml).expect("Failed to parse YAML");
        assert_eq!(config.pacing.move_step_ms, 10);
        // Check defaults are applied
        assert_eq!(config.pacing.handover_delay_ms, 850);
        assert!(matches!(config.chance, ChanceConfig::EventKeyed { seed: 42 }));
    }

    #[test]
    fn test_invalid_yaml_fails() {
        let invalid_yaml = "this is not: valid: yaml: {{{}}}";
        let result = Config::from_yaml(invalid_yaml);
        assert!(result.is_err());
    }
}
