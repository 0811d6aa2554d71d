//! Dropout layer implementation for regularization
//!
//! This module provides a Dropout layer that randomly zeroes a fraction of
//! input units during training and rescales the survivors ("inverted
//! dropout") so the expected activation is unchanged. During inference,
//! inputs pass through untouched.

use ndarray::{Array2, Zip};
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{NetworkError, Result};
use crate::layers::{ensure_compiled, ensure_width, make_network_id, validate_compile_args, Layer};
use crate::utils::seeded_rng;

const KIND: &str = "Dropout";

/// Dropout layer for regularization.
///
/// During training each element is kept when an independent uniform draw
/// exceeds `rate`, and the result is divided by `1 - rate`. The boolean
/// filter of the last training-mode forward pass is kept for exactly one
/// `backward` call.
///
/// Dropout does not change dimensionality: `units` is set to the input width
/// when the layer is compiled.
///
/// # Fields
///
/// * `rate` - Probability of dropping each unit, strictly between 0 and 1
/// * `units` - Number of input/output features, known after `compile`
/// * `dropout_filter` - Elements kept by the last training forward pass
/// * `rng` - Generator owned by this layer for mask sampling
///
/// # Example
///
/// ```
/// use ndarray::Array2;
/// use sequential_nn::layers::{Dropout, Layer};
///
/// let mut layer = Dropout::with_seed(0.3, 7).unwrap();
/// layer.compile(2, 5).unwrap();
/// assert_eq!(layer.units(), Some(5));
/// assert_eq!(layer.network_id(), Some("Dropout2"));
///
/// let inputs = Array2::<f32>::ones((4, 5));
/// assert_eq!(layer.forward(&inputs, false).unwrap(), inputs);
/// ```
pub struct Dropout {
    rate: f32,
    units: Option<usize>,
    network_id: Option<String>,
    is_compiled: bool,
    dropout_filter: Option<Array2<bool>>,
    rng: StdRng,
}

impl Dropout {
    /// Creates a dropout layer whose masks are drawn from an entropy-seeded generator.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless `0 < rate < 1`.
    pub fn new(rate: f32) -> Result<Self> {
        Self::build(rate, seeded_rng(None))
    }

    /// Creates a dropout layer with a reproducible mask sequence.
    pub fn with_seed(rate: f32, seed: u64) -> Result<Self> {
        Self::build(rate, seeded_rng(Some(seed)))
    }

    fn build(rate: f32, rng: StdRng) -> Result<Self> {
        // Also rejects NaN
        if !(rate > 0.0 && rate < 1.0) {
            return Err(NetworkError::InvalidArgument(format!(
                "Dropout rate must be between 0 and 1, got {}",
                rate
            )));
        }

        Ok(Self {
            rate,
            units: None,
            network_id: None,
            is_compiled: false,
            dropout_filter: None,
            rng,
        })
    }

    /// Get the dropout rate.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// The filter cached by the last training-mode forward pass, if it has
    /// not been consumed by `backward` yet.
    pub fn dropout_filter(&self) -> Option<&Array2<bool>> {
        self.dropout_filter.as_ref()
    }

    fn keep_probability(&self) -> f32 {
        1.0 - self.rate
    }

    fn compiled_units(&self) -> Result<usize> {
        ensure_compiled(KIND, self.is_compiled)?;
        self.units.ok_or_else(|| {
            NetworkError::NotReady("Dropout layer units must be defined".to_string())
        })
    }

    fn context(&self, pass: &str) -> String {
        format!("{} {}", self.network_id.as_deref().unwrap_or(KIND), pass)
    }
}

impl Layer for Dropout {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn compile(&mut self, position: usize, input_width: usize) -> Result<()> {
        validate_compile_args(KIND, position, input_width)?;

        self.units = Some(input_width);
        self.network_id = Some(make_network_id(KIND, position));
        self.dropout_filter = None;
        self.is_compiled = true;
        Ok(())
    }

    /// Forward propagation through the dropout layer.
    ///
    /// In training mode, draws one uniform value per element, keeps elements
    /// whose draw exceeds `rate`, zeroes the rest, and divides the result by
    /// `1 - rate`. In inference mode, returns the inputs unchanged and leaves
    /// the cached filter alone.
    fn forward(&mut self, inputs: &Array2<f32>, in_training: bool) -> Result<Array2<f32>> {
        let units = self.compiled_units()?;
        ensure_width(&self.context("forward"), units, inputs)?;

        if !in_training {
            return Ok(inputs.clone());
        }

        let rate = self.rate;
        let rng = &mut self.rng;
        let filter = Array2::from_shape_simple_fn(inputs.raw_dim(), || rng.gen::<f32>() > rate);

        let keep_probability = self.keep_probability();
        let outputs = Zip::from(inputs)
            .and(&filter)
            .map_collect(|&x, &keep| if keep { x / keep_probability } else { 0.0 });

        self.dropout_filter = Some(filter);
        Ok(outputs)
    }

    /// Backward propagation through the dropout layer.
    ///
    /// Rescales the incoming gradients by `1 / (1 - rate)` and zeroes every
    /// element that was dropped in the paired forward pass. The cached filter
    /// is consumed.
    ///
    /// # Errors
    ///
    /// `NotReady` if no training-mode forward pass precedes this call,
    /// `ShapeMismatch` if the gradients do not match the cached filter.
    fn backward(&mut self, output_gradients: &Array2<f32>) -> Result<Array2<f32>> {
        let units = self.compiled_units()?;
        let context = self.context("backward");
        ensure_width(&context, units, output_gradients)?;

        let filter = self.dropout_filter.take().ok_or_else(|| {
            NetworkError::NotReady(format!(
                "{} has no dropout filter; run a training-mode forward pass first",
                context
            ))
        })?;
        if filter.dim() != output_gradients.dim() {
            return Err(NetworkError::shape(
                context,
                format!("{:?}", filter.dim()),
                format!("{:?}", output_gradients.dim()),
            ));
        }

        let keep_probability = self.keep_probability();
        let input_gradients = Zip::from(output_gradients)
            .and(&filter)
            .map_collect(|&g, &keep| if keep { g / keep_probability } else { 0.0 });
        Ok(input_gradients)
    }

    fn units(&self) -> Option<usize> {
        self.units
    }

    fn is_trainable(&self) -> bool {
        false
    }

    fn is_compiled(&self) -> bool {
        self.is_compiled
    }

    fn network_id(&self) -> Option<&str> {
        self.network_id.as_deref()
    }
}
