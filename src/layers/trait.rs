//! Layer trait definition for neural network layers
//!
//! This module defines the core Layer trait that all layer types must implement.
//! The trait covers the layer lifecycle (construct, compile once, then forward
//! and backward repeatedly) and the parameter update step.

use ndarray::Array2;

use crate::error::{NetworkError, Result};
use crate::optimizers::Optimizer;

/// Core trait for neural network layers.
///
/// All layer types (Input, Dense, Dropout) implement this trait so a `Model`
/// can hold them as one homogeneous `Vec<Box<dyn Layer>>`.
///
/// Arrays are `(examples, units)`: the trailing dimension is the feature
/// width and the leading dimension is the batch.
///
/// # Example
///
/// ```
/// use ndarray::Array2;
/// use sequential_nn::layers::{Dropout, Layer};
///
/// let mut layer = Dropout::with_seed(0.5, 42).unwrap();
/// layer.compile(1, 4).unwrap();
///
/// let inputs = Array2::<f32>::ones((2, 4));
/// let outputs = layer.forward(&inputs, true).unwrap();
/// let grads = layer.backward(&Array2::ones((2, 4))).unwrap();
/// assert_eq!(outputs.dim(), grads.dim());
/// ```
pub trait Layer {
    /// Short kind name used to derive the network identifier (e.g. `"Dropout"`).
    fn kind(&self) -> &'static str;

    /// Bind the layer into a network.
    ///
    /// # Arguments
    ///
    /// * `position` - 1-based index of the layer in its model
    /// * `input_width` - Number of units produced by the preceding layer
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `position` or `input_width` is zero.
    ///
    /// # Notes
    ///
    /// Compiling twice re-binds the layer; a `Model` compiles each layer once.
    fn compile(&mut self, position: usize, input_width: usize) -> Result<()>;

    /// Forward propagation through the layer.
    ///
    /// `in_training` selects training-mode behaviour for layers where the two
    /// modes differ. Layers may cache whatever their `backward` needs.
    ///
    /// # Errors
    ///
    /// `NotReady` before `compile`, `ShapeMismatch` if the trailing input
    /// dimension is not the layer's input width.
    fn forward(&mut self, inputs: &Array2<f32>, in_training: bool) -> Result<Array2<f32>>;

    /// Backward propagation through the layer.
    ///
    /// Takes the gradient of the loss with respect to this layer's outputs
    /// and returns the gradient with respect to its inputs. Trainable layers
    /// also keep their parameter gradients for the following `update`.
    ///
    /// # Errors
    ///
    /// Same readiness and shape checks as `forward`, plus `NotReady` if the
    /// layer has nothing cached from a preceding forward pass.
    fn backward(&mut self, output_gradients: &Array2<f32>) -> Result<Array2<f32>>;

    /// Update layer parameters from the gradients of the last `backward`.
    ///
    /// The optimizer turns raw gradients into the effective step; with `Sgd`
    /// this is `param -= learning_rate * grad`. Non-trainable layers keep the
    /// default no-op.
    fn update(&mut self, _learning_rate: f32, _optimizer: &mut dyn Optimizer) -> Result<()> {
        Ok(())
    }

    /// Output width. `None` until the layer knows it (before `compile` for
    /// pass-through layers).
    fn units(&self) -> Option<usize>;

    /// Whether the model should call `update` on this layer.
    fn is_trainable(&self) -> bool;

    fn is_compiled(&self) -> bool;

    /// Display identifier such as `"Dropout2"`, assigned at compile time.
    fn network_id(&self) -> Option<&str>;

    /// Whether this layer is the input-designating sentinel.
    fn is_input(&self) -> bool {
        false
    }

    /// Number of trainable scalars held by the layer.
    fn parameter_count(&self) -> usize {
        0
    }
}

/// Check the arguments every `compile` implementation receives.
pub(crate) fn validate_compile_args(kind: &str, position: usize, input_width: usize) -> Result<()> {
    if position < 1 {
        return Err(NetworkError::InvalidArgument(format!(
            "{} layer position must be greater than zero",
            kind
        )));
    }
    if input_width < 1 {
        return Err(NetworkError::InvalidArgument(format!(
            "{} layer input units must be greater than zero",
            kind
        )));
    }
    Ok(())
}

/// Network identifier derived from the layer kind and its position.
pub(crate) fn make_network_id(kind: &str, position: usize) -> String {
    format!("{}{}", kind, position)
}

/// Fail with `NotReady` unless the layer has been compiled.
pub(crate) fn ensure_compiled(kind: &str, compiled: bool) -> Result<()> {
    if !compiled {
        return Err(NetworkError::NotReady(format!(
            "{} layer must be compiled before use",
            kind
        )));
    }
    Ok(())
}

/// Fail with `ShapeMismatch` unless the trailing dimension equals `expected`.
pub(crate) fn ensure_width(context: &str, expected: usize, array: &Array2<f32>) -> Result<()> {
    let actual = array.ncols();
    if actual != expected {
        return Err(NetworkError::shape(
            context,
            format!("{} units", expected),
            format!("{} units", actual),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_compile_args() {
        assert!(validate_compile_args("Dense", 1, 1).is_ok());
        assert!(matches!(
            validate_compile_args("Dense", 0, 4),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            validate_compile_args("Dense", 2, 0),
            Err(NetworkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_make_network_id() {
        assert_eq!(make_network_id("Dropout", 3), "Dropout3");
    }

    #[test]
    fn test_ensure_width() {
        let array = Array2::<f32>::zeros((2, 5));
        assert!(ensure_width("test", 5, &array).is_ok());
        assert!(matches!(
            ensure_width("test", 4, &array),
            Err(NetworkError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_ensure_compiled() {
        assert!(ensure_compiled("Dropout", true).is_ok());
        assert!(matches!(
            ensure_compiled("Dropout", false),
            Err(NetworkError::NotReady(_))
        ));
    }
}
