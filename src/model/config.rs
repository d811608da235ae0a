//! Training Configuration Module
//!
//! Hyperparameters of a run. The defaults are the values the classifier is
//! meant to be trained with; a JSON file may override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::cnn::AslNetConfig;
use crate::utils::error::{AslError, Result, ResultExt};

pub const DEFAULT_EPOCHS: usize = 20;
pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
pub const DEFAULT_SEED: u64 = 42;

/// Model hyperparameters that are not dictated by the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelHyperparams {
    /// Dropout rate between the fully connected layers
    pub dropout: f64,
    /// Width of the hidden fully connected layer
    pub hidden_size: usize,
}

impl Default for ModelHyperparams {
    fn default() -> Self {
        let net = AslNetConfig::new();
        Self {
            dropout: net.dropout,
            hidden_size: net.hidden_size,
        }
    }
}

/// Training hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training epochs
    pub epochs: usize,

    /// Mini-batch size for both splits
    pub batch_size: usize,

    /// Adam learning rate
    pub learning_rate: f64,

    /// Seed for the per-epoch shuffle
    pub seed: u64,

    pub model: ModelHyperparams,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            batch_size: DEFAULT_BATCH_SIZE,
            learning_rate: DEFAULT_LEARNING_RATE,
            seed: DEFAULT_SEED,
            model: ModelHyperparams::default(),
        }
    }
}

impl TrainingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(AslError::Config("epochs must be greater than 0".to_string()));
        }
        if self.batch_size == 0 {
            return Err(AslError::Config("batch_size must be greater than 0".to_string()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(AslError::Config("learning_rate must be a positive number".to_string()));
        }
        if !(0.0..1.0).contains(&self.model.dropout) {
            return Err(AslError::Config("dropout must be in range [0.0, 1.0)".to_string()));
        }
        if self.model.hidden_size == 0 {
            return Err(AslError::Config("hidden_size must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Network configuration for samples of `(channels, height, width)`
    pub fn net_config(&self, sample_dims: [usize; 3]) -> AslNetConfig {
        let [channels, height, width] = sample_dims;
        super::cnn::config_for_images(channels, height, width)
            .with_dropout(self.model.dropout)
            .with_hidden_size(self.model.hidden_size)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize training config")?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&json).with_context(|| format!("Invalid training config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.epochs, 20);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.model.dropout, 0.3);
        assert_eq!(config.model.hidden_size, 6000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TrainingConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        let mut config = TrainingConfig::default();
        config.learning_rate = -1.0;
        assert!(config.validate().is_err());

        let mut config = TrainingConfig::default();
        config.model.dropout = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "epochs": 3, "model": { "hidden_size": 64 } }"#).unwrap();

        let config = TrainingConfig::load(&path).unwrap();
        assert_eq!(config.epochs, 3);
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.model.hidden_size, 64);
        assert_eq!(config.model.dropout, 0.3);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = TrainingConfig::default();
        config.seed = 7;

        config.save(&path).unwrap();
        assert_eq!(TrainingConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ epochs: }").unwrap();

        let err = TrainingConfig::load(&path).unwrap_err();
        assert!(format!("{}", err).contains("Invalid training config"));
    }

    #[test]
    fn test_net_config_uses_sample_dims() {
        let net = TrainingConfig::default().net_config([3, 124, 124]);
        assert_eq!(net.flattened_size(), Some(13456));
        assert_eq!(net.num_classes, 29);
    }
}
