//! Activation functions for neural networks
//!
//! Element-wise activations applied by dense layers. Each activation knows
//! its own derivative expressed in terms of the activation's *output*, which
//! is what the dense layer caches for the backward pass.

use ndarray::Array2;

/// Element-wise activation applied after a dense layer's affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Identity; used for output layers that feed a from-logits loss.
    #[default]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    /// Parse a lowercase activation name, as used in architecture files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "linear" | "identity" => Some(Activation::Linear),
            "relu" => Some(Activation::Relu),
            "sigmoid" => Some(Activation::Sigmoid),
            "tanh" => Some(Activation::Tanh),
            _ => None,
        }
    }

    /// Apply the activation in place.
    pub fn apply(&self, values: &mut Array2<f32>) {
        match self {
            Activation::Linear => {}
            Activation::Relu => values.mapv_inplace(|x| x.max(0.0)),
            Activation::Sigmoid => values.mapv_inplace(sigmoid),
            Activation::Tanh => values.mapv_inplace(f32::tanh),
        }
    }

    /// Derivative with respect to the pre-activation, given the activation output.
    pub fn derivative(&self, outputs: &Array2<f32>) -> Array2<f32> {
        match self {
            Activation::Linear => Array2::ones(outputs.raw_dim()),
            Activation::Relu => outputs.mapv(|y| if y > 0.0 { 1.0 } else { 0.0 }),
            Activation::Sigmoid => outputs.mapv(|y| y * (1.0 - y)),
            Activation::Tanh => outputs.mapv(|y| 1.0 - y * y),
        }
    }
}

/// Sigmoid activation: 1 / (1 + exp(-x))
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Softmax applied row-wise.
///
/// Uses the max-subtraction trick for numerical stability to avoid overflow
/// with large logits.
pub fn softmax_rows(logits: &Array2<f32>) -> Array2<f32> {
    let mut probabilities = logits.clone();
    for mut row in probabilities.rows_mut() {
        let max_value = row.fold(f32::NEG_INFINITY, |acc, &x| acc.max(x));
        row.mapv_inplace(|x| (x - max_value).exp());
        let sum = row.sum();
        row.mapv_inplace(|x| x / sum);
    }
    probabilities
}
