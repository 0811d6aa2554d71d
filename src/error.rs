//! Error types shared by layers, losses, optimizers and the model.

use thiserror::Error;

/// Every failure the library can report.
///
/// The first four variants are usage errors: they are raised eagerly at the
/// call that detected them and never retried. The last two only come out of
/// the JSON config loaders.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// A hyperparameter or argument outside its valid range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was invoked before the state it depends on exists.
    #[error("not ready: {0}")]
    NotReady(String),

    /// Array dimensions disagree with what the layer or loss expects.
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// A malformed layer sequence handed to the model.
    #[error("invalid model structure: {0}")]
    Structural(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn shape(
        context: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        NetworkError::ShapeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NetworkError>;
