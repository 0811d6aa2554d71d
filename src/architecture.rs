//! Architecture configuration structures
//!
//! This module describes a whole model (input width, loss and layer stack) in
//! JSON so architectures can be changed without code changes, and builds a
//! wired `Model` from such a description.

use serde::Deserialize;
use std::fs;

use crate::error::{NetworkError, Result};
use crate::layers::{Dense, Dropout, InputLayer, Layer};
use crate::losses::{CategoricalCrossEntropy, Loss, MeanSquaredError};
use crate::model::Model;
use crate::utils::Activation;

/// Configuration for a single layer after the input layer.
///
/// - **Dense**: Requires `units`, optional `activation` (default `"linear"`)
/// - **Dropout**: Requires `rate`, strictly between 0 and 1
///
/// # Examples
///
/// ```json
/// { "layer_type": "dense", "units": 128, "activation": "relu" }
/// ```
///
/// ```json
/// { "layer_type": "dropout", "rate": 0.3 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    /// Type of layer: "dense" or "dropout"
    pub layer_type: String,

    /// Output units for a Dense layer
    pub units: Option<usize>,
    /// Activation name for a Dense layer
    pub activation: Option<String>,

    /// Drop probability for a Dropout layer
    pub rate: Option<f32>,
}

/// Loss selection, tagged by `"type"`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LossConfig {
    MeanSquaredError,
    CategoricalCrossEntropy {
        #[serde(default)]
        from_logits: bool,
    },
}

impl LossConfig {
    pub fn build(&self) -> Box<dyn Loss> {
        match *self {
            LossConfig::MeanSquaredError => Box::new(MeanSquaredError::new()),
            LossConfig::CategoricalCrossEntropy { from_logits } => {
                Box::new(CategoricalCrossEntropy::new(from_logits))
            }
        }
    }
}

/// Configuration for the entire model.
///
/// # Example
///
/// ```json
/// {
///   "input_units": 784,
///   "loss": { "type": "categorical_cross_entropy", "from_logits": true },
///   "layers": [
///     { "layer_type": "dense", "units": 128, "activation": "relu" },
///     { "layer_type": "dropout", "rate": 0.3 },
///     { "layer_type": "dense", "units": 10 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureConfig {
    /// Width declared by the input layer
    pub input_units: usize,
    pub loss: LossConfig,
    /// Layers following the input layer, in order
    pub layers: Vec<LayerConfig>,
}

/// Loads an architecture configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use sequential_nn::architecture::load_architecture;
///
/// let arch = load_architecture("config/architectures/digits_mlp.json").unwrap();
/// assert!(!arch.layers.is_empty());
/// ```
pub fn load_architecture(path: &str) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)?;
    parse_architecture(&contents)
}

/// Parse and validate an architecture from a JSON string.
pub fn parse_architecture(contents: &str) -> Result<ArchitectureConfig> {
    let config: ArchitectureConfig = serde_json::from_str(contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

fn validate_architecture(config: &ArchitectureConfig) -> Result<()> {
    if config.input_units == 0 {
        return Err(NetworkError::InvalidArgument(
            "input_units must be greater than 0".to_string(),
        ));
    }

    if config.layers.is_empty() {
        return Err(NetworkError::Structural(
            "Architecture must have at least one layer after the input".to_string(),
        ));
    }

    for (i, layer) in config.layers.iter().enumerate() {
        validate_layer(layer, i + 1)?;
    }

    Ok(())
}

/// Checks that the layer has the fields its type needs and that they are in range.
fn validate_layer(layer: &LayerConfig, position: usize) -> Result<()> {
    match layer.layer_type.to_lowercase().as_str() {
        "dense" => {
            match layer.units {
                None => {
                    return Err(NetworkError::InvalidArgument(format!(
                        "Layer {}: Dense layer requires 'units'",
                        position
                    )))
                }
                Some(0) => {
                    return Err(NetworkError::InvalidArgument(format!(
                        "Layer {}: units must be greater than 0",
                        position
                    )))
                }
                Some(_) => {}
            }
            activation_of(layer, position)?;
        }
        "dropout" => {
            let rate = layer.rate.ok_or_else(|| {
                NetworkError::InvalidArgument(format!(
                    "Layer {}: Dropout layer requires 'rate'",
                    position
                ))
            })?;
            if !(rate > 0.0 && rate < 1.0) {
                return Err(NetworkError::InvalidArgument(format!(
                    "Layer {}: rate must be between 0 and 1, got {}",
                    position, rate
                )));
            }
        }
        "input" => {
            return Err(NetworkError::Structural(format!(
                "Layer {}: the input layer is implied by input_units",
                position
            )))
        }
        _ => {
            return Err(NetworkError::InvalidArgument(format!(
                "Layer {}: Unknown layer type: {}",
                position, layer.layer_type
            )))
        }
    }
    Ok(())
}

fn activation_of(layer: &LayerConfig, position: usize) -> Result<Activation> {
    match &layer.activation {
        None => Ok(Activation::Linear),
        Some(name) => Activation::from_name(name).ok_or_else(|| {
            NetworkError::InvalidArgument(format!(
                "Layer {}: Invalid activation function '{}'. Must be one of: linear, relu, sigmoid, tanh",
                position, name
            ))
        }),
    }
}

/// Builds a wired model from an architecture configuration.
///
/// With `seed`, every stochastic component (weight initialization, dropout
/// masks, shuffling) gets its own seed derived from it, so the whole model
/// is reproducible.
pub fn build_model(config: &ArchitectureConfig, seed: Option<u64>) -> Result<Model> {
    validate_architecture(config)?;

    let mut layers: Vec<Box<dyn Layer>> = Vec::with_capacity(config.layers.len() + 1);
    layers.push(Box::new(InputLayer::new(config.input_units)?));

    for (i, layer_config) in config.layers.iter().enumerate() {
        let position = i + 1;
        let layer_seed = seed.map(|s| s.wrapping_add(position as u64));

        match layer_config.layer_type.to_lowercase().as_str() {
            "dense" => {
                let units = layer_config.units.unwrap_or(0);
                let activation = activation_of(layer_config, position)?;
                let layer = match layer_seed {
                    Some(s) => Dense::with_seed(units, activation, s)?,
                    None => Dense::new(units, activation)?,
                };
                layers.push(Box::new(layer));
            }
            "dropout" => {
                let rate = layer_config.rate.unwrap_or(0.0);
                let layer = match layer_seed {
                    Some(s) => Dropout::with_seed(rate, s)?,
                    None => Dropout::new(rate)?,
                };
                layers.push(Box::new(layer));
            }
            other => {
                return Err(NetworkError::InvalidArgument(format!(
                    "Layer {}: Unknown layer type: {}",
                    position, other
                )))
            }
        }
    }

    let model = Model::new(config.loss.build(), layers)?;
    Ok(match seed {
        Some(s) => model.with_seed(s),
        None => model,
    })
}
