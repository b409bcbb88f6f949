//! Primary error enum for resolution and materialisation flows.

use thiserror::Error;

use super::aggregate::AggregatedErrors;

/// Errors that can occur while loading declarations, resolving an
/// identifier, or materialising a request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// The identifier supplied for resolution contained no segments.
    #[error("no service specified")]
    NoServiceSpecified,

    /// No service with the requested name exists in the model.
    #[error("service not found: {name:?}")]
    ServiceNotFound {
        /// Name taken from the first identifier segment.
        name: String,
    },

    /// The service declares no servers, so no base URL can be chosen.
    #[error("no servers defined for service {service:?}")]
    NoServersDefined {
        /// Name of the offending service.
        service: String,
    },

    /// A server was requested by name but the service does not declare it.
    #[error("no server {server:?} defined for service {service:?}")]
    ServerNotFound {
        /// Requested server name.
        server: String,
        /// Service that was searched.
        service: String,
    },

    /// An identifier segment did not match any child resource.
    #[error("resource not found: {path:?}")]
    ResourceNotFound {
        /// Identifier path truncated at the failing segment.
        path: String,
    },

    /// Endpoint selection yielded nothing for the resolved resource.
    #[error("no endpoint defined for {path}")]
    NoEndpointDefined {
        /// Display path of the identifier being resolved.
        path: String,
    },

    /// A `var(...)` call in a templated body exhausted every name.
    #[error("var not found: {name:?}")]
    VarNotFound {
        /// First variable name passed to the call.
        name: String,
    },

    /// A templated string body failed to parse or render.
    #[error("template error: {message}")]
    Template {
        /// Human-readable description of the failure.
        message: String,
    },

    /// A URI template could not be parsed.
    #[error("invalid URI template {template:?}: {message}")]
    UriTemplate {
        /// Template text as declared.
        template: String,
        /// Description of the syntax problem.
        message: String,
    },

    /// An expanded URI template did not form a valid URL.
    #[error("invalid URL {input:?}: {source}")]
    Url {
        /// Text that failed to parse.
        input: String,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A structured body could not be serialised.
    #[error("failed to encode body: {0}")]
    Encoding(#[source] serde_json::Error),

    /// A `fetch(...)` snippet could not be imported.
    #[error("invalid fetch call: {message}")]
    Fetch {
        /// Reason the snippet was rejected.
        message: String,
    },

    /// The model cannot be written back into declaration form.
    #[error("cannot convert {path} to a declaration: {message}")]
    Conversion {
        /// Display path of the offending resource.
        path: String,
        /// Description of the unsupported construct.
        message: String,
    },

    /// A declaration file uses an extension with no registered parser.
    #[error("unsupported declaration format: '{path}'")]
    UnsupportedFormat {
        /// File that was rejected.
        path: camino::Utf8PathBuf,
    },

    /// Error originating from a declaration file.
    #[error("declaration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: camino::Utf8PathBuf,
        /// Underlying error reported by the loader.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error while extracting declarations from a provider.
    #[error("failed to gather declarations: {0}")]
    Gathering(#[from] Box<figment::Error>),

    /// A name in the model breaks the identifier rules.
    #[error("validation failed for '{key}': {message}")]
    Validation {
        /// The offending name.
        key: String,
        /// Human-readable description of the rule that was broken.
        message: String,
    },

    /// Multiple errors were collected during a single pass.
    #[error("multiple model errors:\n{0}")]
    Aggregate(Box<AggregatedErrors>),
}
