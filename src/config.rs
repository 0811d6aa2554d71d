//! Configuration structures for training
//!
//! This module provides the configuration consumed by `Model::fit_with_config`:
//! batch size, epochs, learning rate, an optional shuffle seed and an optional
//! optimizer description.

use serde::Deserialize;
use std::fs;

use crate::error::{NetworkError, Result};
use crate::optimizers::{Adam, Optimizer, Sgd};

/// Training configuration parsed from JSON.
///
/// # Example
///
/// ```json
/// {
///   "batch_size": 256,
///   "epochs": 30,
///   "learning_rate": 0.0001,
///   "seed": 42,
///   "optimizer": { "type": "adam", "beta1": 0.9, "beta2": 0.99 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FitConfig {
    /// Examples per batch; clamped to the dataset size when above half of it
    pub batch_size: usize,

    /// Number of passes over the training set
    pub epochs: usize,

    /// Base step size handed to the optimizer
    pub learning_rate: f32,

    /// Seed for the example shuffling generator
    pub seed: Option<u64>,

    /// Optimizer to install before training; the model keeps its own if absent
    pub optimizer: Option<OptimizerConfig>,
}

/// Optimizer selection, tagged by `"type"`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Sgd,
    Adam {
        #[serde(default = "default_beta1")]
        beta1: f32,
        #[serde(default = "default_beta2")]
        beta2: f32,
        #[serde(default = "default_epsilon")]
        epsilon: f32,
    },
}

fn default_beta1() -> f32 {
    0.9
}

fn default_beta2() -> f32 {
    0.999
}

fn default_epsilon() -> f32 {
    1e-7
}

impl OptimizerConfig {
    /// Instantiate the described optimizer.
    pub fn build(&self) -> Result<Box<dyn Optimizer>> {
        match *self {
            OptimizerConfig::Sgd => Ok(Box::new(Sgd::new())),
            OptimizerConfig::Adam {
                beta1,
                beta2,
                epsilon,
            } => Ok(Box::new(Adam::new(beta1, beta2, epsilon)?)),
        }
    }
}

/// Loads a training configuration from a JSON file.
///
/// # Returns
///
/// `Ok(FitConfig)` on success, or an error if the file cannot be read, the
/// JSON is invalid, or a value is out of range.
///
/// # Examples
///
/// ```no_run
/// use sequential_nn::config::load_fit_config;
///
/// let cfg = load_fit_config("config/fit_digits.json").unwrap();
/// assert_eq!(cfg.epochs, 30);
/// ```
pub fn load_fit_config(path: &str) -> Result<FitConfig> {
    let contents = fs::read_to_string(path)?;
    parse_fit_config(&contents)
}

/// Parse and validate a training configuration from a JSON string.
pub fn parse_fit_config(contents: &str) -> Result<FitConfig> {
    let config: FitConfig = serde_json::from_str(contents)?;
    validate_fit_config(&config)?;
    Ok(config)
}

fn validate_fit_config(config: &FitConfig) -> Result<()> {
    if config.batch_size < 1 {
        return Err(NetworkError::InvalidArgument(
            "batch_size must be greater than 0".to_string(),
        ));
    }

    if config.epochs < 1 {
        return Err(NetworkError::InvalidArgument(
            "epochs must be greater than 0".to_string(),
        ));
    }

    if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
        return Err(NetworkError::InvalidArgument(format!(
            "learning_rate must be positive, got {}",
            config.learning_rate
        )));
    }

    // Building the optimizer runs its own range checks
    if let Some(optimizer) = &config.optimizer {
        optimizer.build()?;
    }

    Ok(())
}
