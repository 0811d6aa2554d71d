//! Categorical cross-entropy for one-hot labels.

use ndarray::Array2;

use crate::error::Result;
use crate::losses::{ensure_same_shape, Loss};
use crate::utils::activations::softmax_rows;

/// Probabilities are clamped to `[CLIP, 1 - CLIP]` before taking logs.
const CLIP: f32 = 1e-7;

/// Cross-entropy `-Σ y·ln(p)` averaged over examples.
///
/// With `from_logits` the predictions are raw scores and a row-wise softmax
/// is applied first; the gradient then simplifies to `(softmax(p) - y) / n`.
/// Without it, predictions are taken to already be probabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalCrossEntropy {
    from_logits: bool,
}

impl CategoricalCrossEntropy {
    pub fn new(from_logits: bool) -> Self {
        Self { from_logits }
    }

    pub fn from_logits(&self) -> bool {
        self.from_logits
    }

    fn probabilities(&self, predictions: &Array2<f32>) -> Array2<f32> {
        let probabilities = if self.from_logits {
            softmax_rows(predictions)
        } else {
            predictions.clone()
        };
        probabilities.mapv(|p| p.clamp(CLIP, 1.0 - CLIP))
    }
}

impl Loss for CategoricalCrossEntropy {
    fn calculate(&self, predictions: &Array2<f32>, labels: &Array2<f32>) -> Result<f32> {
        ensure_same_shape(self.name(), predictions, labels)?;
        let log_probabilities = self.probabilities(predictions).mapv(f32::ln);
        let total = -(labels * &log_probabilities).sum();
        Ok(total / predictions.nrows() as f32)
    }

    fn gradate(&self, predictions: &Array2<f32>, labels: &Array2<f32>) -> Result<Array2<f32>> {
        ensure_same_shape(self.name(), predictions, labels)?;
        let n_examples = predictions.nrows() as f32;

        if self.from_logits {
            Ok((softmax_rows(predictions) - labels) / n_examples)
        } else {
            let probabilities = self.probabilities(predictions);
            Ok(-(labels / &probabilities) / n_examples)
        }
    }

    fn name(&self) -> &'static str {
        "categorical_cross_entropy"
    }
}
