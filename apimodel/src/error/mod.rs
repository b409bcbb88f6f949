//! Error types produced while building, resolving, and materialising models.

mod aggregate;
mod constructors;
mod conversions;
mod types;

pub use aggregate::AggregatedErrors;
pub use types::ModelError;
