//! Optimizer abstractions for neural network parameter updates
//!
//! Optimizers decide how a raw gradient turns into a parameter step. The
//! model owns a single optimizer and lends it to every trainable layer during
//! the update phase of each batch; layers identify each of their parameter
//! tensors with a stable key so stateful optimizers can keep per-tensor
//! statistics.
//!
//! # Available Optimizers
//!
//! - SGD: Vanilla gradient descent, the default
//! - Adam: Adaptive moment estimation with bias correction
//!
//! # Example
//!
//! ```
//! use sequential_nn::optimizers::{Optimizer, Sgd};
//!
//! let mut optimizer = Sgd::new();
//! let mut weights = vec![1.0f32, 2.0];
//! optimizer.update("Dense1.weights", &mut weights, &[0.5, 0.5], 0.1).unwrap();
//! assert!((weights[0] - 0.95).abs() < 1e-6);
//! ```

pub mod adam;
pub mod sgd;

pub use adam::Adam;
pub use sgd::Sgd;

use crate::error::{NetworkError, Result};

/// Core trait for neural network optimizers.
///
/// The learning rate is passed on every call rather than stored, so the same
/// optimizer can follow whatever rate `Model::fit` was given.
pub trait Optimizer {
    /// Apply one step to `parameters` using `gradients`.
    ///
    /// # Arguments
    ///
    /// * `key` - Stable identifier of the parameter tensor (e.g. `"Dense1.weights"`)
    /// * `parameters` - Parameters to update in place
    /// * `gradients` - Gradient of the loss with respect to each parameter
    /// * `learning_rate` - Base step size
    ///
    /// # Errors
    ///
    /// Returns a shape mismatch if `parameters` and `gradients` differ in length.
    fn update(
        &mut self,
        key: &str,
        parameters: &mut [f32],
        gradients: &[f32],
        learning_rate: f32,
    ) -> Result<()>;

    /// Clear any accumulated state. A no-op for stateless optimizers.
    fn reset(&mut self);

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

pub(crate) fn check_lengths(key: &str, parameters: &[f32], gradients: &[f32]) -> Result<()> {
    if parameters.len() != gradients.len() {
        return Err(NetworkError::shape(
            format!("optimizer update of {}", key),
            format!("{} gradients", parameters.len()),
            format!("{} gradients", gradients.len()),
        ));
    }
    Ok(())
}
