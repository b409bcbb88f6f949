//! Extensions for mapping errors to `ModelResult` concisely.
//!
//! # Examples
//!
//! ```
//! use apimodel::{ModelResult, ModelResultExt};
//!
//! fn encode() -> ModelResult<Vec<u8>> {
//!     serde_json::to_vec(&42).into_model()
//! }
//! # assert_eq!(encode().ok(), Some(b"42".to_vec()));
//! ```

use std::sync::Arc;

use crate::{ModelError, ModelResult};

/// Generic extension for mapping any `Result<T, E>` with `E: Into<ModelError>`
/// into a `ModelResult<T>`.
pub trait ModelResultExt<T, E> {
    /// Convert `Result<T, E>` into `ModelResult<T>` using `Into<ModelError>`.
    ///
    /// # Errors
    ///
    /// Propagates the original error after conversion into `Arc<ModelError>`.
    fn into_model(self) -> ModelResult<T>;
}

impl<T, E> ModelResultExt<T, E> for Result<T, E>
where
    E: Into<ModelError>,
{
    fn into_model(self) -> ModelResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

/// Convert shared model errors into `figment::Error` for interop with tests
/// that return Figment's error type.
pub trait IntoFigmentError {
    /// Convert into a `figment::Error`, preserving message text.
    fn into_figment(self) -> figment::Error;
}

impl IntoFigmentError for Arc<ModelError> {
    fn into_figment(self) -> figment::Error {
        figment::Error::from(self.to_string())
    }
}

/// Extension to convert `ModelResult<T>` into `Result<T, figment::Error>`.
pub trait ResultIntoFigment<T> {
    /// Map the error side into a `figment::Error`.
    ///
    /// # Errors
    ///
    /// Returns the converted error when `self` is `Err`.
    fn to_figment(self) -> Result<T, figment::Error>;
}

impl<T> ResultIntoFigment<T> for ModelResult<T> {
    fn to_figment(self) -> Result<T, figment::Error> {
        self.map_err(IntoFigmentError::into_figment)
    }
}
