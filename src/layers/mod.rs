//! Layer abstractions for neural networks
//!
//! This module provides the Layer trait and the layer types a model can be
//! composed from.

mod r#trait;
pub mod dense;
pub mod dropout;
pub mod input;

// Re-export the Layer trait for convenience
pub use r#trait::Layer;
pub use dense::Dense;
pub use dropout::Dropout;
pub use input::InputLayer;

pub(crate) use r#trait::{ensure_compiled, ensure_width, make_network_id, validate_compile_args};
