//! Declarative HTTP API models.
//!
//! Services are declared in JSON, TOML or YAML documents (see [`config`]) and
//! bound once into an immutable [`Model`]. A [`ServiceSpec`] such as
//! `httpbin/status/codes` is then resolved to a [`ResolvedResource`], whose
//! attributes are merged down the hierarchy (see [`merge`]) and expanded
//! (see [`expand`]) into a concrete [`Request`].
//!
//! ```
//! use apimodel::{Model, ServiceSpec, Vars, config};
//!
//! let doc = r#"{
//!     "name": "httpbin",
//!     "servers": [{"name": "production", "baseUrl": "https://httpbin.org/"}],
//!     "resources": [{"name": "get", "uri": "/get"}]
//! }"#;
//! let file = config::parse_config_str(config::Format::Json, doc)?;
//! let model = Model::new(&config::Config::from(file));
//! let spec: ServiceSpec = "httpbin/get".parse().unwrap_or_default();
//! let request = model.resolve(&spec, None, None)?.eval_request(None, &Vars::new())?;
//! assert_eq!(request.method(), "GET");
//! assert_eq!(request.url().as_str(), "https://httpbin.org/get");
//! # Ok::<(), std::sync::Arc<apimodel::ModelError>>(())
//! ```

use std::sync::Arc;

pub mod config;
mod error;
pub mod expand;
mod fetch;
mod identifier;
pub mod merge;
mod model;
pub mod request;
mod resolve;
mod result_ext;
mod uri_template;
mod validate;

pub use config::{Header, Link, Vars};
pub use error::{AggregatedErrors, ModelError};
pub use fetch::{FetchCall, FetchOptions};
pub use identifier::ServiceSpec;
pub use model::{Auth, BasicAuth, Client, Endpoint, GrpcClient, Model, Resource, Server, Service};
pub use request::{Body, BodyKind, Request};
pub use resolve::ResolvedResource;
pub use result_ext::{IntoFigmentError, ModelResultExt, ResultIntoFigment};
pub use uri_template::UriTemplate;
pub use validate::validate;

/// Result type used throughout the crate. Errors are shared so they can be
/// collected into aggregates without cloning.
pub type ModelResult<T> = Result<T, Arc<ModelError>>;
