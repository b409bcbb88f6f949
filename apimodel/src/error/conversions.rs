//! Trait-based conversions between external error types and `ModelError`.

use figment::Error as FigmentError;

use super::ModelError;

/// Serialisation failures only arise while encoding bodies.
impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encoding(e)
    }
}

impl From<FigmentError> for ModelError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(Box::new(e))
    }
}

impl From<ModelError> for FigmentError {
    /// Allow using `?` in tests that return `figment::Error`.
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Gathering(fe) => *fe,
            other => Self::from(other.to_string()),
        }
    }
}
