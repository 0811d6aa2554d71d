//! Dense (fully connected) layer implementation
//!
//! This module provides a Dense layer (also known as Linear or Fully Connected
//! layer) that performs the transformation: output = activation(input × weights + biases)

use ndarray::{Array1, Array2, Axis};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{NetworkError, Result};
use crate::layers::{ensure_compiled, ensure_width, make_network_id, validate_compile_args, Layer};
use crate::optimizers::Optimizer;
use crate::utils::{seeded_rng, Activation};

const KIND: &str = "Dense";

/// Dense (fully connected) layer with weights and biases.
///
/// Performs `y = f(xW + b)` where x is the input (batch_size × input_width),
/// W is the weight matrix (input_width × units), b is the bias vector (units)
/// and f is the activation.
///
/// The input width is only known once the model compiles the layer, so the
/// weights are created in `compile`, not in the constructor.
///
/// # Example
///
/// ```
/// use sequential_nn::layers::{Dense, Layer};
/// use sequential_nn::utils::Activation;
///
/// let mut layer = Dense::with_seed(64, Activation::Relu, 42).unwrap();
/// layer.compile(1, 784).unwrap();
/// assert_eq!(layer.parameter_count(), 784 * 64 + 64);
/// ```
pub struct Dense {
    units: usize,
    activation: Activation,
    input_width: Option<usize>,
    network_id: Option<String>,
    is_compiled: bool,
    weights: Array2<f32>,
    biases: Array1<f32>,
    last_inputs: Option<Array2<f32>>,
    last_outputs: Option<Array2<f32>>,
    weight_gradients: Option<Array2<f32>>,
    bias_gradients: Option<Array1<f32>>,
    rng: StdRng,
}

impl Dense {
    /// Creates a dense layer whose weights are drawn from an entropy-seeded generator.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `units` is zero.
    pub fn new(units: usize, activation: Activation) -> Result<Self> {
        Self::build(units, activation, seeded_rng(None))
    }

    /// Creates a dense layer with reproducible weight initialization.
    pub fn with_seed(units: usize, activation: Activation, seed: u64) -> Result<Self> {
        Self::build(units, activation, seeded_rng(Some(seed)))
    }

    fn build(units: usize, activation: Activation, rng: StdRng) -> Result<Self> {
        if units < 1 {
            return Err(NetworkError::InvalidArgument(
                "Dense layer units must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            units,
            activation,
            input_width: None,
            network_id: None,
            is_compiled: false,
            weights: Array2::zeros((0, units)),
            biases: Array1::zeros(0),
            last_inputs: None,
            last_outputs: None,
            weight_gradients: None,
            bias_gradients: None,
            rng,
        })
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn input_width(&self) -> Option<usize> {
        self.input_width
    }

    /// Weight matrix (input_width × units); empty before `compile`.
    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn biases(&self) -> &Array1<f32> {
        &self.biases
    }

    fn context(&self, pass: &str) -> String {
        format!("{} {}", self.network_id.as_deref().unwrap_or(KIND), pass)
    }
}

impl Layer for Dense {
    fn kind(&self) -> &'static str {
        KIND
    }

    /// Xavier/Glorot initialization: weights uniform in [-limit, limit]
    /// where limit = sqrt(6 / (input_width + units)); biases start at zero.
    fn compile(&mut self, position: usize, input_width: usize) -> Result<()> {
        validate_compile_args(KIND, position, input_width)?;

        let limit = (6.0f32 / (input_width + self.units) as f32).sqrt();
        let distribution = Uniform::new_inclusive(-limit, limit);
        let rng = &mut self.rng;
        self.weights =
            Array2::from_shape_simple_fn((input_width, self.units), || rng.sample(&distribution));
        self.biases = Array1::zeros(self.units);

        self.input_width = Some(input_width);
        self.network_id = Some(make_network_id(KIND, position));
        self.last_inputs = None;
        self.last_outputs = None;
        self.weight_gradients = None;
        self.bias_gradients = None;
        self.is_compiled = true;
        Ok(())
    }

    fn forward(&mut self, inputs: &Array2<f32>, _in_training: bool) -> Result<Array2<f32>> {
        ensure_compiled(KIND, self.is_compiled)?;
        ensure_width(&self.context("forward"), self.weights.nrows(), inputs)?;

        let mut outputs = inputs.dot(&self.weights) + &self.biases;
        self.activation.apply(&mut outputs);

        self.last_inputs = Some(inputs.clone());
        self.last_outputs = Some(outputs.clone());
        Ok(outputs)
    }

    fn backward(&mut self, output_gradients: &Array2<f32>) -> Result<Array2<f32>> {
        ensure_compiled(KIND, self.is_compiled)?;
        let context = self.context("backward");
        ensure_width(&context, self.units, output_gradients)?;

        let (inputs, outputs) = match (&self.last_inputs, &self.last_outputs) {
            (Some(inputs), Some(outputs)) => (inputs, outputs),
            _ => {
                return Err(NetworkError::NotReady(format!(
                    "{} has no cached forward pass",
                    context
                )))
            }
        };
        if outputs.dim() != output_gradients.dim() {
            return Err(NetworkError::shape(
                context,
                format!("{:?}", outputs.dim()),
                format!("{:?}", output_gradients.dim()),
            ));
        }

        // Gradient through the activation, then through the affine transform
        let delta = output_gradients * &self.activation.derivative(outputs);
        self.weight_gradients = Some(inputs.t().dot(&delta));
        self.bias_gradients = Some(delta.sum_axis(Axis(0)));

        Ok(delta.dot(&self.weights.t()))
    }

    fn update(&mut self, learning_rate: f32, optimizer: &mut dyn Optimizer) -> Result<()> {
        ensure_compiled(KIND, self.is_compiled)?;
        let id = self.context("update");

        // Gradients are cleared only after both steps succeed
        let (weight_gradients, bias_gradients): (Vec<f32>, Vec<f32>) =
            match (&self.weight_gradients, &self.bias_gradients) {
                (Some(w), Some(b)) => (w.iter().copied().collect(), b.iter().copied().collect()),
                _ => {
                    return Err(NetworkError::NotReady(format!(
                        "{} has no gradients; run backward first",
                        id
                    )))
                }
            };

        let prefix = self.network_id.as_deref().unwrap_or(KIND);

        let weights = self.weights.as_slice_mut().ok_or_else(|| {
            NetworkError::NotReady(format!("{} weights are not contiguous", id))
        })?;
        optimizer.update(
            &format!("{}.weights", prefix),
            weights,
            &weight_gradients,
            learning_rate,
        )?;

        let biases = self.biases.as_slice_mut().ok_or_else(|| {
            NetworkError::NotReady(format!("{} biases are not contiguous", id))
        })?;
        optimizer.update(
            &format!("{}.biases", prefix),
            biases,
            &bias_gradients,
            learning_rate,
        )?;

        self.weight_gradients = None;
        self.bias_gradients = None;
        Ok(())
    }

    fn units(&self) -> Option<usize> {
        Some(self.units)
    }

    fn is_trainable(&self) -> bool {
        true
    }

    fn is_compiled(&self) -> bool {
        self.is_compiled
    }

    fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }

    /// input_width × units weights plus units biases.
    fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}
