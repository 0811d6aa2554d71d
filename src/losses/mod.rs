//! Loss functions consumed by the training loop
//!
//! A loss turns the final layer's outputs and the labels into a scalar
//! (`calculate`) and into the gradient that seeds backpropagation
//! (`gradate`). Both must be pure functions of their arguments so the
//! per-epoch metric recorded by `Model::fit` is reproducible.

pub mod categorical_cross_entropy;
pub mod mean_squared_error;

pub use categorical_cross_entropy::CategoricalCrossEntropy;
pub use mean_squared_error::MeanSquaredError;

use ndarray::Array2;

use crate::error::{NetworkError, Result};

/// Core trait for loss functions.
pub trait Loss {
    /// Scalar loss of `predictions` against `labels`, averaged over examples.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the two arrays differ in shape.
    fn calculate(&self, predictions: &Array2<f32>, labels: &Array2<f32>) -> Result<f32>;

    /// Gradient of the loss with respect to `predictions`; same shape as
    /// `predictions`.
    fn gradate(&self, predictions: &Array2<f32>, labels: &Array2<f32>) -> Result<Array2<f32>>;

    /// Short name used in log output.
    fn name(&self) -> &'static str;
}

pub(crate) fn ensure_same_shape(
    loss: &str,
    predictions: &Array2<f32>,
    labels: &Array2<f32>,
) -> Result<()> {
    if predictions.dim() != labels.dim() {
        return Err(NetworkError::shape(
            format!("{} loss", loss),
            format!("labels of shape {:?}", predictions.dim()),
            format!("{:?}", labels.dim()),
        ));
    }
    if predictions.nrows() == 0 {
        return Err(NetworkError::InvalidArgument(format!(
            "{} loss needs at least one example",
            loss
        )));
    }
    Ok(())
}
