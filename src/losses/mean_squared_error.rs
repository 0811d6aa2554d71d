//! Mean squared error.

use ndarray::Array2;

use crate::error::Result;
use crate::losses::{ensure_same_shape, Loss};

/// `mean((p - y)²)` over every element.
///
/// The gradient is `2(p - y) / n_elements`, the exact derivative of the
/// loss value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl MeanSquaredError {
    pub fn new() -> Self {
        MeanSquaredError
    }
}

impl Loss for MeanSquaredError {
    fn calculate(&self, predictions: &Array2<f32>, labels: &Array2<f32>) -> Result<f32> {
        ensure_same_shape(self.name(), predictions, labels)?;
        let diff = predictions - labels;
        Ok((&diff * &diff).sum() / diff.len() as f32)
    }

    fn gradate(&self, predictions: &Array2<f32>, labels: &Array2<f32>) -> Result<Array2<f32>> {
        ensure_same_shape(self.name(), predictions, labels)?;
        let diff = predictions - labels;
        let n_elements = diff.len() as f32;
        Ok(diff * (2.0 / n_elements))
    }

    fn name(&self) -> &'static str {
        "mean_squared_error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_mse_calculate() {
        let predictions = array![[1.0f32, 2.0], [3.0, 4.0]];
        let labels = array![[1.0f32, 0.0], [3.0, 2.0]];
        // (0 + 4 + 0 + 4) / 4
        assert_relative_eq!(MeanSquaredError.calculate(&predictions, &labels).unwrap(), 2.0);
    }

    #[test]
    fn test_mse_perfect_prediction() {
        let values = array![[0.5f32, -0.5]];
        assert_eq!(MeanSquaredError.calculate(&values, &values).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_gradate() {
        let predictions = array![[1.0f32], [2.0]];
        let labels = array![[0.0f32], [0.0]];
        let grads = MeanSquaredError.gradate(&predictions, &labels).unwrap();
        assert_relative_eq!(grads[[0, 0]], 1.0);
        assert_relative_eq!(grads[[1, 0]], 2.0);
    }

    #[test]
    fn test_mse_gradate_averages_over_every_column() {
        let predictions = array![[1.0f32, 0.0, 0.0]];
        let labels = array![[0.0f32, 0.0, 0.0]];
        let grads = MeanSquaredError.gradate(&predictions, &labels).unwrap();
        assert_relative_eq!(grads[[0, 0]], 2.0 / 3.0);

        // Central difference of the loss value along the first element
        let h = 1e-2f32;
        let mut plus = predictions.clone();
        plus[[0, 0]] += h;
        let mut minus = predictions.clone();
        minus[[0, 0]] -= h;
        let numerical = (MeanSquaredError.calculate(&plus, &labels).unwrap()
            - MeanSquaredError.calculate(&minus, &labels).unwrap())
            / (2.0 * h);
        assert_relative_eq!(grads[[0, 0]], numerical, epsilon = 1e-3);
    }

    #[test]
    fn test_mse_shape_mismatch() {
        let predictions = Array2::<f32>::zeros((2, 3));
        let labels = Array2::<f32>::zeros((2, 2));
        assert!(matches!(
            MeanSquaredError.calculate(&predictions, &labels),
            Err(NetworkError::ShapeMismatch { .. })
        ));
    }
}
