use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Scalar configuration of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub mini_batch_size: usize,
    pub learning_rate: f64,
    /// Reshuffle the training batch before partitioning it, every epoch.
    pub shuffle: bool,
    /// Seed of the shuffling generator.
    pub seed: u64,
    /// Compute per-sample gradients of a mini-batch on the rayon pool.
    pub parallel: bool,
    /// Log the epoch report every this many epochs.
    pub epochs_per_log: Option<usize>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 30,
            mini_batch_size: 10,
            learning_rate: 3.0,
            shuffle: false,
            seed: 0,
            parallel: false,
            epochs_per_log: Some(1),
        }
    }
}

impl TrainConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::InvalidArgument("epochs must be non-zero".into()));
        }
        if self.mini_batch_size == 0 {
            return Err(Error::InvalidArgument(
                "mini_batch_size must be non-zero".into(),
            ));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.epochs_per_log == Some(0) {
            return Err(Error::InvalidArgument(
                "epochs_per_log must be non-zero when set".into(),
            ));
        }
        Ok(())
    }
}
