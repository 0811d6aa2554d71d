//! Stochastic Gradient Descent (SGD) optimizer implementation
//!
//! Performs the basic gradient descent update:
//! `parameter = parameter - learning_rate * gradient`

use crate::error::Result;
use crate::optimizers::{check_lengths, Optimizer};

/// Vanilla gradient descent without momentum or adaptive rates.
///
/// `w = w - η * ∇L/∂w`
///
/// This is the optimizer a `Model` uses unless another one is installed, so
/// `Model::fit(.., learning_rate)` is plain mini-batch gradient descent.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgd;

impl Sgd {
    pub fn new() -> Self {
        Sgd
    }
}

impl Optimizer for Sgd {
    fn update(
        &mut self,
        key: &str,
        parameters: &mut [f32],
        gradients: &[f32],
        learning_rate: f32,
    ) -> Result<()> {
        check_lengths(key, parameters, gradients)?;

        for (param, grad) in parameters.iter_mut().zip(gradients.iter()) {
            *param -= learning_rate * grad;
        }
        Ok(())
    }

    fn reset(&mut self) {
        // Vanilla SGD has no state to reset
    }

    fn name(&self) -> &'static str {
        "sgd"
    }
}
