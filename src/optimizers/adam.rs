//! Adam (Adaptive Moment Estimation) optimizer implementation
//!
//! Combines momentum and adaptive learning rates with bias correction.

use std::collections::HashMap;

use crate::error::{NetworkError, Result};
use crate::optimizers::{check_lengths, Optimizer};

/// Adam optimizer.
///
/// The update rule for each parameter tensor is:
///
/// ```text
/// m_t = β1 * m_{t-1} + (1 - β1) * gradient
/// v_t = β2 * v_{t-1} + (1 - β2) * gradient²
/// m_hat = m_t / (1 - β1^t)
/// v_hat = v_t / (1 - β2^t)
/// parameter = parameter - α * m_hat / (√v_hat + ε)
/// ```
///
/// Moment estimates and the time step are tracked separately for every
/// parameter key, so one instance can serve all trainable layers of a model.
///
/// # Reference
///
/// Kingma, D. P., & Ba, J. (2014). Adam: A method for stochastic optimization.
/// arXiv preprint arXiv:1412.6980.
#[derive(Debug, Clone)]
pub struct Adam {
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    state: HashMap<String, Moments>,
}

#[derive(Debug, Clone)]
struct Moments {
    m: Vec<f32>,
    v: Vec<f32>,
    t: i32,
}

impl Moments {
    fn zeros(len: usize) -> Self {
        Moments {
            m: vec![0.0; len],
            v: vec![0.0; len],
            t: 0,
        }
    }
}

impl Adam {
    /// Creates a new Adam optimizer.
    ///
    /// # Errors
    ///
    /// Both betas must lie in `[0, 1)` and `epsilon` must be positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use sequential_nn::optimizers::Adam;
    ///
    /// let optimizer = Adam::new(0.9, 0.99, 1e-7).unwrap();
    /// assert_eq!(optimizer.beta1(), 0.9);
    /// ```
    pub fn new(beta1: f32, beta2: f32, epsilon: f32) -> Result<Self> {
        for (name, beta) in [("beta1", beta1), ("beta2", beta2)] {
            if !(0.0..1.0).contains(&beta) {
                return Err(NetworkError::InvalidArgument(format!(
                    "Adam {} must be in range [0.0, 1.0), got {}",
                    name, beta
                )));
            }
        }
        if epsilon.is_nan() || epsilon <= 0.0 {
            return Err(NetworkError::InvalidArgument(format!(
                "Adam epsilon must be positive, got {}",
                epsilon
            )));
        }

        Ok(Self {
            beta1,
            beta2,
            epsilon,
            state: HashMap::new(),
        })
    }

    pub fn beta1(&self) -> f32 {
        self.beta1
    }

    pub fn beta2(&self) -> f32 {
        self.beta2
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Number of updates applied so far to the tensor named `key`.
    pub fn step_count(&self, key: &str) -> usize {
        self.state.get(key).map_or(0, |moments| moments.t as usize)
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self {
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-7,
            state: HashMap::new(),
        }
    }
}

impl Optimizer for Adam {
    fn update(
        &mut self,
        key: &str,
        parameters: &mut [f32],
        gradients: &[f32],
        learning_rate: f32,
    ) -> Result<()> {
        check_lengths(key, parameters, gradients)?;

        let moments = self
            .state
            .entry(key.to_string())
            .or_insert_with(|| Moments::zeros(parameters.len()));

        // A tensor that changed size is a different tensor; start over
        if moments.m.len() != parameters.len() {
            *moments = Moments::zeros(parameters.len());
        }

        moments.t += 1;
        let bias_correction1 = 1.0 - self.beta1.powi(moments.t);
        let bias_correction2 = 1.0 - self.beta2.powi(moments.t);

        for i in 0..parameters.len() {
            let grad = gradients[i];
            moments.m[i] = self.beta1 * moments.m[i] + (1.0 - self.beta1) * grad;
            moments.v[i] = self.beta2 * moments.v[i] + (1.0 - self.beta2) * grad * grad;

            let m_hat = moments.m[i] / bias_correction1;
            let v_hat = moments.v[i] / bias_correction2;

            parameters[i] -= learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.state.clear();
    }

    fn name(&self) -> &'static str {
        "adam"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adam_new() {
        let optimizer = Adam::new(0.9, 0.999, 1e-8).unwrap();
        assert_eq!(optimizer.beta1(), 0.9);
        assert_eq!(optimizer.beta2(), 0.999);
        assert_eq!(optimizer.epsilon(), 1e-8);
        assert_eq!(optimizer.step_count("w"), 0);
    }

    #[test]
    fn test_adam_invalid_hyperparameters() {
        assert!(matches!(
            Adam::new(1.0, 0.999, 1e-8),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            Adam::new(0.9, -0.1, 1e-8),
            Err(NetworkError::InvalidArgument(_))
        ));
        assert!(matches!(
            Adam::new(0.9, 0.999, 0.0),
            Err(NetworkError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_adam_update() {
        let mut optimizer = Adam::default();
        let mut params = vec![1.0, 2.0, 3.0];
        let grads = vec![0.1, 0.2, 0.3];

        let original_params = params.clone();
        optimizer.update("w", &mut params, &grads, 0.001).unwrap();

        // Parameters should have decreased (gradients are positive)
        for (new, old) in params.iter().zip(original_params.iter()) {
            assert!(new < old);
        }
    }

    #[test]
    fn test_adam_first_step_is_learning_rate_sized() {
        // With bias correction the first step is ~lr * sign(g)
        let mut optimizer = Adam::new(0.9, 0.999, 1e-8).unwrap();
        let mut params = vec![0.0, 0.0];
        optimizer.update("w", &mut params, &[5.0, -0.01], 0.01).unwrap();

        assert!((params[0] + 0.01).abs() < 1e-4);
        assert!((params[1] - 0.01).abs() < 1e-4);
    }

    #[test]
    fn test_adam_state_is_per_key() {
        let mut optimizer = Adam::default();
        let mut weights = vec![1.0, 2.0];
        let mut biases = vec![0.0];

        optimizer.update("Dense1.weights", &mut weights, &[0.1, 0.2], 0.01).unwrap();
        optimizer.update("Dense1.weights", &mut weights, &[0.1, 0.2], 0.01).unwrap();
        optimizer.update("Dense1.biases", &mut biases, &[0.3], 0.01).unwrap();

        assert_eq!(optimizer.step_count("Dense1.weights"), 2);
        assert_eq!(optimizer.step_count("Dense1.biases"), 1);
    }

    #[test]
    fn test_adam_reset() {
        let mut optimizer = Adam::default();
        let mut params = vec![1.0, 2.0, 3.0];
        optimizer.update("w", &mut params, &[0.1, 0.2, 0.3], 0.001).unwrap();
        assert_eq!(optimizer.step_count("w"), 1);

        optimizer.reset();
        assert_eq!(optimizer.step_count("w"), 0);
    }

    #[test]
    fn test_adam_resized_tensor_restarts() {
        let mut optimizer = Adam::default();
        let mut params = vec![1.0, 2.0];
        optimizer.update("w", &mut params, &[0.1, 0.2], 0.001).unwrap();
        optimizer.update("w", &mut params, &[0.1, 0.2], 0.001).unwrap();

        let mut bigger = vec![1.0, 2.0, 3.0];
        optimizer.update("w", &mut bigger, &[0.1, 0.2, 0.3], 0.001).unwrap();
        assert_eq!(optimizer.step_count("w"), 1);
    }

    #[test]
    fn test_adam_mismatched_lengths() {
        let mut optimizer = Adam::default();
        let mut params = vec![1.0, 2.0, 3.0];
        let result = optimizer.update("w", &mut params, &[0.1, 0.2], 0.001);
        assert!(matches!(result, Err(NetworkError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_adam_adaptive_learning_rates() {
        let mut optimizer = Adam::new(0.9, 0.999, 1e-8).unwrap();
        let mut params = vec![1.0, 1.0];

        // One parameter gets large gradients, one gets small gradients
        for _ in 0..5 {
            optimizer.update("w", &mut params, &[10.0, 0.1], 0.01).unwrap();
        }

        // Both move by a comparable amount despite very different magnitudes
        let moved_large = 1.0 - params[0];
        let moved_small = 1.0 - params[1];
        assert!(moved_large > 0.0 && moved_small > 0.0);
        assert!((moved_large - moved_small).abs() < 0.01);
    }
}
