//! Constructors and aggregation helpers for `ModelError`.

use std::sync::Arc;

use super::{AggregatedErrors, ModelError};

impl ModelError {
    /// Tries to build a [`ModelError`] from an iterator of errors.
    ///
    /// Returns `None` for an empty iterator. A single uniquely owned error is
    /// returned as-is; a shared one is wrapped in [`Self::Aggregate`]. Two or
    /// more errors always produce an aggregate.
    #[must_use]
    pub fn try_aggregate<I, E>(errors: I) -> Option<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<Arc<Self>>,
    {
        let mut arcs: Vec<Arc<Self>> = errors.into_iter().map(Into::into).collect();
        if arcs.is_empty() {
            return None;
        }
        Some(if arcs.len() == 1 {
            let last = arcs.pop()?;
            match Arc::try_unwrap(last) {
                Ok(err) => err,
                Err(shared) => Self::Aggregate(Box::new(AggregatedErrors::new(vec![shared]))),
            }
        } else {
            Self::Aggregate(Box::new(AggregatedErrors::new(arcs)))
        })
    }

    /// Construct a gathering error from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use apimodel::ModelError;
    /// let e = ModelError::gathering(figment::Error::from("boom"));
    /// assert!(matches!(e, ModelError::Gathering(_)));
    /// ```
    #[must_use]
    pub fn gathering(source: figment::Error) -> Self {
        Self::Gathering(Box::new(source))
    }

    /// Construct a template error from any displayable message.
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Construct a fetch import error.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Construct a validation error for `key`.
    #[must_use]
    pub fn validation(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Construct a file error wrapping `source`.
    #[must_use]
    pub fn file(
        path: impl Into<camino::Utf8PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::File {
            path: path.into(),
            source: source.into(),
        }
    }
}
