//! Input layer: the sentinel at position 0 of every model.
//!
//! It only declares the input width and checks that examples match it.

use ndarray::Array2;

use crate::error::{NetworkError, Result};
use crate::layers::{ensure_width, make_network_id, Layer};

const KIND: &str = "Input";

/// Input-designating layer carrying the declared feature width.
///
/// Unlike other layers it is ready from construction; a `Model` never
/// compiles it.
#[derive(Debug, Clone)]
pub struct InputLayer {
    units: usize,
    network_id: String,
}

impl InputLayer {
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `units` is zero.
    pub fn new(units: usize) -> Result<Self> {
        if units < 1 {
            return Err(NetworkError::InvalidArgument(
                "Input layer units must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            units,
            network_id: make_network_id(KIND, 0),
        })
    }
}

impl Layer for InputLayer {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn compile(&mut self, position: usize, _input_width: usize) -> Result<()> {
        Err(NetworkError::InvalidArgument(format!(
            "Input layer cannot be compiled at position {}; it only occupies position 0",
            position
        )))
    }

    fn forward(&mut self, inputs: &Array2<f32>, _in_training: bool) -> Result<Array2<f32>> {
        ensure_width("Input0 forward", self.units, inputs)?;
        Ok(inputs.clone())
    }

    fn backward(&mut self, output_gradients: &Array2<f32>) -> Result<Array2<f32>> {
        ensure_width("Input0 backward", self.units, output_gradients)?;
        Ok(output_gradients.clone())
    }

    fn units(&self) -> Option<usize> {
        Some(self.units)
    }

    fn is_trainable(&self) -> bool {
        false
    }

    fn is_compiled(&self) -> bool {
        true
    }

    fn network_id(&self) -> Option<&str> {
        Some(&self.network_id)
    }

    fn is_input(&self) -> bool {
        true
    }
}
