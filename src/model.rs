//! Sequential model: layer composition, prediction and mini-batch training
//!
//! A `Model` owns an ordered list of layers and one loss. Construction checks
//! the list and compiles every layer after the input layer against the width
//! of the layer before it. `fit` then runs mini-batch gradient descent:
//! shuffle, forward in training mode, seed backpropagation with the loss
//! gradient, backward through every layer in reverse, and let each trainable
//! layer update itself through the model's optimizer.

use log::{debug, info};
use ndarray::{s, Array2, Axis};
use rand::rngs::StdRng;

use crate::config::FitConfig;
use crate::error::{NetworkError, Result};
use crate::layers::Layer;
use crate::losses::Loss;
use crate::optimizers::{Optimizer, Sgd};
use crate::utils::{permutation, seeded_rng};

/// Ordered stack of layers trained against a single loss.
///
/// # Example
///
/// ```
/// use ndarray::Array2;
/// use sequential_nn::layers::{Dense, Dropout, InputLayer, Layer};
/// use sequential_nn::losses::MeanSquaredError;
/// use sequential_nn::utils::Activation;
/// use sequential_nn::Model;
///
/// let layers: Vec<Box<dyn Layer>> = vec![
///     Box::new(InputLayer::new(3).unwrap()),
///     Box::new(Dense::with_seed(8, Activation::Relu, 1).unwrap()),
///     Box::new(Dropout::with_seed(0.2, 2).unwrap()),
///     Box::new(Dense::with_seed(1, Activation::Linear, 3).unwrap()),
/// ];
/// let mut model = Model::new(Box::new(MeanSquaredError), layers)
///     .unwrap()
///     .with_seed(4);
///
/// let examples = Array2::<f32>::ones((6, 3));
/// let labels = Array2::<f32>::zeros((6, 1));
/// let history = model.fit(&examples, &labels, 2, 5, 0.01).unwrap();
/// assert_eq!(history.len(), 5);
/// assert_eq!(model.predict(&examples).unwrap().dim(), (6, 1));
/// ```
pub struct Model {
    loss: Box<dyn Loss>,
    layers: Vec<Box<dyn Layer>>,
    optimizer: Box<dyn Optimizer>,
    rng: StdRng,
}

impl Model {
    /// Build and wire a model.
    ///
    /// The first layer must be an input layer and no other layer may be one.
    /// Every following layer is compiled at its 1-based position with the
    /// preceding layer's output width.
    ///
    /// # Errors
    ///
    /// `Structural` for a misplaced or missing input layer; any error a
    /// layer's `compile` reports is passed through.
    pub fn new(loss: Box<dyn Loss>, mut layers: Vec<Box<dyn Layer>>) -> Result<Self> {
        info!("Model is being built...");

        if layers.is_empty() {
            return Err(NetworkError::Structural(
                "The first layer must be an input layer.".to_string(),
            ));
        }
        for (layer_idx, layer) in layers.iter().enumerate() {
            if layer_idx == 0 && !layer.is_input() {
                return Err(NetworkError::Structural(format!(
                    "The first layer must be an input layer, got {}.",
                    layer.kind()
                )));
            }
            if layer_idx != 0 && layer.is_input() {
                return Err(NetworkError::Structural(format!(
                    "Input layers can only be the first layer, found one at position {}.",
                    layer_idx
                )));
            }
        }

        // Connect the layers to one another
        for layer_idx in 1..layers.len() {
            let previous = &layers[layer_idx - 1];
            let input_width = previous.units().ok_or_else(|| {
                NetworkError::NotReady(format!(
                    "{} did not report its units",
                    previous.network_id().unwrap_or(previous.kind())
                ))
            })?;
            layers[layer_idx].compile(layer_idx, input_width)?;
        }

        info!("Model built with {} layers", layers.len());

        Ok(Self {
            loss,
            layers,
            optimizer: Box::new(Sgd::new()),
            rng: seeded_rng(None),
        })
    }

    /// Replace the optimizer (SGD by default).
    ///
    /// The optimizer is reset on installation; state it gathered elsewhere
    /// under the same parameter keys is discarded.
    pub fn with_optimizer(mut self, optimizer: Box<dyn Optimizer>) -> Self {
        self.install_optimizer(optimizer);
        self
    }

    /// Seed the generator used to shuffle examples between epochs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = seeded_rng(Some(seed));
        self
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    pub fn loss(&self) -> &dyn Loss {
        self.loss.as_ref()
    }

    pub fn optimizer(&self) -> &dyn Optimizer {
        self.optimizer.as_ref()
    }

    /// Width declared by the input layer.
    pub fn input_units(&self) -> usize {
        self.layers[0].units().unwrap_or(0)
    }

    /// Width of the final layer's outputs.
    pub fn output_units(&self) -> usize {
        self.layers
            .last()
            .and_then(|layer| layer.units())
            .unwrap_or(0)
    }

    /// Total trainable scalars across all layers.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.parameter_count()).sum()
    }

    /// Forward propagate `examples` through every layer in inference mode.
    ///
    /// Returns an array of shape `(examples, output_units)`.
    pub fn predict(&mut self, examples: &Array2<f32>) -> Result<Array2<f32>> {
        self.propagate(examples, false)
    }

    /// Loss over `examples` with the current parameters, in inference mode.
    pub fn evaluate(&mut self, examples: &Array2<f32>, labels: &Array2<f32>) -> Result<f32> {
        let outputs = self.predict(examples)?;
        self.loss.calculate(&outputs, labels)
    }

    /// Optimize the model with mini-batch gradient descent.
    ///
    /// If `batch_size` exceeds half the dataset, the whole dataset is used as
    /// one batch. Otherwise each epoch runs `n_examples / batch_size` batches
    /// and the remainder of the shuffled order is skipped for that epoch.
    ///
    /// # Returns
    ///
    /// The loss over the full training set after each epoch, in order.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero batch size or epoch count, an empty
    /// dataset, or a non-positive learning rate; `ShapeMismatch` if the
    /// examples and labels disagree on the number of rows. Any error raised
    /// by a layer or the loss aborts training and is returned as-is.
    pub fn fit(
        &mut self,
        examples: &Array2<f32>,
        labels: &Array2<f32>,
        batch_size: usize,
        epochs: usize,
        learning_rate: f32,
    ) -> Result<Vec<f32>> {
        if batch_size < 1 {
            return Err(NetworkError::InvalidArgument(
                "Batch size must be positive.".to_string(),
            ));
        }
        if epochs < 1 {
            return Err(NetworkError::InvalidArgument(
                "Epochs must be positive.".to_string(),
            ));
        }
        if !(learning_rate.is_finite() && learning_rate > 0.0) {
            return Err(NetworkError::InvalidArgument(format!(
                "Learning rate must be a positive number, got {}",
                learning_rate
            )));
        }

        let n_examples = examples.nrows();
        if n_examples == 0 {
            return Err(NetworkError::InvalidArgument(
                "Training set must contain at least one example.".to_string(),
            ));
        }
        if labels.nrows() != n_examples {
            return Err(NetworkError::shape(
                "fit labels",
                format!("{} rows", n_examples),
                format!("{} rows", labels.nrows()),
            ));
        }

        let batch_size = effective_batch_size(n_examples, batch_size);
        let n_batches = n_examples / batch_size;

        info!(
            "Fitting the model over {} epochs ({} batches of {} examples, optimizer {})...",
            epochs,
            n_batches,
            batch_size,
            self.optimizer.name()
        );

        let mut training_history = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            // Shuffle the training examples and labels together
            let shuffling_indices = permutation(n_examples, &mut self.rng);
            let permuted_examples = examples.select(Axis(0), &shuffling_indices);
            let permuted_labels = labels.select(Axis(0), &shuffling_indices);

            for batch in 0..n_batches {
                let lower_idx = batch_size * batch;
                let upper_idx = batch_size * (batch + 1);
                let batch_examples = permuted_examples.slice(s![lower_idx..upper_idx, ..]);
                let batch_labels = permuted_labels.slice(s![lower_idx..upper_idx, ..]);

                self.train_step(
                    &batch_examples.to_owned(),
                    &batch_labels.to_owned(),
                    learning_rate,
                )?;
                debug!("Epoch {} batch {}/{} done", epoch + 1, batch + 1, n_batches);
            }

            let current_loss = self.evaluate(examples, labels)?;
            training_history.push(current_loss);
            info!("Epoch {}: loss {:.4}", epoch + 1, current_loss);
        }

        info!("Model is fit after {} epochs", epochs);
        Ok(training_history)
    }

    /// `fit` driven by a loaded `FitConfig`.
    ///
    /// The config's optimizer and seed, when present, replace the model's
    /// before training starts.
    pub fn fit_with_config(
        &mut self,
        examples: &Array2<f32>,
        labels: &Array2<f32>,
        config: &FitConfig,
    ) -> Result<Vec<f32>> {
        if let Some(optimizer) = &config.optimizer {
            self.install_optimizer(optimizer.build()?);
        }
        if let Some(seed) = config.seed {
            self.rng = seeded_rng(Some(seed));
        }
        self.fit(
            examples,
            labels,
            config.batch_size,
            config.epochs,
            config.learning_rate,
        )
    }

    fn install_optimizer(&mut self, mut optimizer: Box<dyn Optimizer>) {
        optimizer.reset();
        debug!("Installed optimizer {}", optimizer.name());
        self.optimizer = optimizer;
    }

    /// One gradient descent step on a single batch.
    fn train_step(
        &mut self,
        batch_examples: &Array2<f32>,
        batch_labels: &Array2<f32>,
        learning_rate: f32,
    ) -> Result<()> {
        let batch_outputs = self.propagate(batch_examples, true)?;

        let mut propagated_gradients = self.loss.gradate(&batch_outputs, batch_labels)?;
        for layer in self.layers.iter_mut().rev() {
            propagated_gradients = layer.backward(&propagated_gradients)?;
        }

        for layer in self.layers.iter_mut() {
            if layer.is_trainable() {
                layer.update(learning_rate, self.optimizer.as_mut())?;
            }
        }
        Ok(())
    }

    fn propagate(&mut self, inputs: &Array2<f32>, in_training: bool) -> Result<Array2<f32>> {
        let mut propagated = inputs.clone();
        for layer in self.layers.iter_mut() {
            propagated = layer.forward(&propagated, in_training)?;
        }
        Ok(propagated)
    }
}

/// Batch sizes above half the dataset fall back to full-batch descent.
fn effective_batch_size(n_examples: usize, batch_size: usize) -> usize {
    if n_examples < batch_size.saturating_mul(2) {
        debug!(
            "Batch size {} exceeds half of {} examples; using full batch",
            batch_size, n_examples
        );
        n_examples
    } else {
        batch_size
    }
}
