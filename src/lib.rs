//! Sequential Neural Network Library
//!
//! A small feed-forward training engine: layers that share one
//! forward/backward/update contract, a `Model` that wires them together and
//! fits them with mini-batch gradient descent, and inverted dropout for
//! regularization.
//!
//! # Modules
//!
//! - `layers`: Layer trait and implementations (Input, Dense, Dropout)
//! - `losses`: Loss trait and implementations (MSE, categorical cross-entropy)
//! - `optimizers`: Optimizer trait and implementations (SGD, Adam)
//! - `model`: Layer composition, prediction and training
//! - `config`: Training configuration loaded from JSON
//! - `architecture`: Model descriptions loaded from JSON
//! - `utils`: Shared utilities (RNG, activation functions)

#[cfg(feature = "blas")]
extern crate blas_src;

pub mod architecture;
pub mod config;
pub mod error;
pub mod layers;
pub mod losses;
pub mod model;
pub mod optimizers;
pub mod utils;

pub use error::{NetworkError, Result};
pub use layers::{Dense, Dropout, InputLayer, Layer};
pub use losses::{CategoricalCrossEntropy, Loss, MeanSquaredError};
pub use model::Model;
pub use optimizers::{Adam, Optimizer, Sgd};
