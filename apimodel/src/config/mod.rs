//! Declaration documents: the serialisable shape services are written in.
//!
//! These types mirror the on-disk vocabulary (`baseUrl`, `rawBody`, one key
//! per method) and are consumed exactly once by [`Model::new`]. The model
//! writes them back out through [`Model::to_config`].
//!
//! [`Model::new`]: crate::Model::new
//! [`Model::to_config`]: crate::Model::to_config

mod header;
mod loader;
#[cfg(feature = "yaml")]
mod yaml;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use header::Header;
pub use loader::{Format, load_config_file, parse_config_str};
#[cfg(feature = "yaml")]
pub use yaml::SaphyrYaml;

/// Variables declared at any level of the hierarchy.
pub type Vars = serde_json::Map<String, Value>;

/// Accumulated services from every loaded declaration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    /// Services in load order.
    #[serde(default)]
    pub services: Vec<Service>,
}

impl Config {
    /// Append the services held by `file`, preserving declaration order.
    pub fn push_file(&mut self, file: File) {
        self.services.extend(file.into_services());
    }
}

impl From<File> for Config {
    fn from(file: File) -> Self {
        Self {
            services: file.into_services(),
        }
    }
}

/// One declaration document: either a single service or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum File {
    /// The document holds one service's fields at the top level.
    Service(Box<Service>),
    /// The document holds a `services` list.
    Services(Vec<Service>),
}

impl File {
    /// Services declared by this document.
    #[must_use]
    pub fn into_services(self) -> Vec<Service> {
        match self {
            Self::Service(service) => vec![*service],
            Self::Services(services) => services,
        }
    }
}

/// Declared service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Service {
    /// Service name, optionally `@scope/name` qualified.
    #[serde(default)]
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Display description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Free-form note for maintainers.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// Servers in declaration order; the first is the default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,
    /// Top-level resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,
    /// Service-wide links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    /// Service-wide variables.
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
    /// Transport selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    /// Service-wide credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

/// Declared server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Server {
    /// Server name used for explicit selection.
    #[serde(default)]
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Display description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Base URL, possibly a URI template.
    #[serde(default)]
    pub base_url: String,
    /// Headers applied to every request through this server.
    #[serde(default, skip_serializing_if = "Header::is_empty")]
    pub headers: Header,
    /// Default form fields.
    #[serde(default, skip_serializing_if = "Header::is_empty")]
    pub form: Header,
    /// Server links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    /// Server variables.
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
    /// Server credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

/// Declared resource, possibly nesting further resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Resource {
    /// Resource name matched against identifier segments.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Display description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Child resources.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Self>,
    /// URI template segment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Resource headers.
    #[serde(default, skip_serializing_if = "Header::is_empty")]
    pub headers: Header,
    /// Resource form fields.
    #[serde(default, skip_serializing_if = "Header::is_empty")]
    pub form: Header,
    /// Resource links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    /// `GET` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<Endpoint>,
    /// `PUT` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put: Option<Endpoint>,
    /// `POST` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Endpoint>,
    /// `DELETE` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Endpoint>,
    /// `OPTIONS` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Endpoint>,
    /// `HEAD` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Endpoint>,
    /// `TRACE` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Endpoint>,
    /// `PATCH` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patch: Option<Endpoint>,
    /// `QUERY` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Endpoint>,
    /// Templated body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Raw body, never expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<Value>,
    /// Resource variables.
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
    /// Resource credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
    /// Command line associated with the resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
}

impl Resource {
    /// Method keys paired with their declared endpoints, in the fixed order
    /// endpoints are bound.
    #[must_use]
    pub fn endpoints(&self) -> [(&'static str, Option<&Endpoint>); 9] {
        [
            ("GET", self.get.as_ref()),
            ("PUT", self.put.as_ref()),
            ("POST", self.post.as_ref()),
            ("DELETE", self.delete.as_ref()),
            ("OPTIONS", self.options.as_ref()),
            ("HEAD", self.head.as_ref()),
            ("TRACE", self.trace.as_ref()),
            ("PATCH", self.patch.as_ref()),
            ("QUERY", self.query.as_ref()),
        ]
    }

    /// Mutable slot for `method`, if it is one of the nine known keys.
    pub fn endpoint_slot(&mut self, method: &str) -> Option<&mut Option<Endpoint>> {
        let slot = match method.to_ascii_lowercase().as_str() {
            "get" => &mut self.get,
            "put" => &mut self.put,
            "post" => &mut self.post,
            "delete" => &mut self.delete,
            "options" => &mut self.options,
            "head" => &mut self.head,
            "trace" => &mut self.trace,
            "patch" => &mut self.patch,
            "query" => &mut self.query,
            _ => return None,
        };
        Some(slot)
    }
}

/// Declared endpoint, keyed by its method in the enclosing resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Endpoint {
    /// Endpoint name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Display description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Endpoint headers.
    #[serde(default, skip_serializing_if = "Header::is_empty")]
    pub headers: Header,
    /// Endpoint form fields.
    #[serde(default, skip_serializing_if = "Header::is_empty")]
    pub form: Header,
    /// Endpoint links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    /// Templated body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Raw body, never expanded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<Value>,
    /// Endpoint variables.
    #[serde(default, skip_serializing_if = "Vars::is_empty")]
    pub vars: Vars,
    /// Endpoint credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Auth>,
}

/// Declared link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Link {
    /// Target, literal or a URI template when `is_template` is set.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href: String,
    /// Language of the target.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub href_lang: String,
    /// Intended audience.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub audience: String,
    /// Relation type.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rel: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// Media type of the target.
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub media_type: String,
    /// Whether `href` is a URI template.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_template: bool,
}

/// Declared transport selection; at most one member may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Client {
    /// Plain HTTP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpClient>,
    /// gRPC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grpc: Option<GrpcClient>,
}

/// HTTP transport options (currently none).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpClient {}

/// gRPC transport options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct GrpcClient {
    /// Skip server reflection when discovering schemas.
    #[serde(default)]
    pub disable_reflection: bool,
    /// Path to a compiled descriptor set.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub proto_set: String,
    /// Connect without TLS.
    #[serde(default)]
    pub plaintext: bool,
}

/// Declared credential; at most one member may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Auth {
    /// HTTP basic credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<BasicAuth>,
}

/// Declared basic credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BasicAuth {
    /// User name.
    #[serde(default)]
    pub user: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// Shorthand for building header maps in tests and fixtures.
#[must_use]
pub fn header<I, K, V>(entries: I) -> Header
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    entries
        .into_iter()
        .map(|(k, vs)| (k.into(), vs.into_iter().map(Into::into).collect()))
        .collect::<BTreeMap<_, _>>()
        .into()
}
