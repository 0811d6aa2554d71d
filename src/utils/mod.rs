//! Shared utilities for neural network implementations
//!
//! This module provides common utilities like random number generation and
//! activation functions used across layers and the model.

pub mod activations;
pub mod rng;

pub use activations::Activation;
pub use rng::{permutation, seeded_rng};
