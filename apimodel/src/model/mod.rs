//! The in-memory declaration tree: services, servers, resources, endpoints.
//!
//! A [`Model`] is built once from a [`Config`](crate::config::Config) and is
//! read-only afterwards. Lookups by service name go through an index built
//! at construction time, so a model can be shared across threads freely.

mod binding;
mod to_config;

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
use uncased::UncasedStr;

pub use crate::config::{Header, Link, Vars};

/// Immutable collection of services indexed by name.
#[derive(Debug, Clone, Default)]
pub struct Model {
    services: Vec<Service>,
    index: HashMap<String, usize>,
}

impl Model {
    /// Build a model from already-bound services.
    ///
    /// When two services share a name the later one replaces the earlier
    /// in place.
    #[must_use]
    pub fn from_services<I>(services: I) -> Self
    where
        I: IntoIterator<Item = Service>,
    {
        let mut model = Self::default();
        for service in services {
            if let Some(&slot) = model.index.get(&service.name) {
                tracing::debug!(name = %service.name, "replacing duplicate service");
                if let Some(existing) = model.services.get_mut(slot) {
                    *existing = service;
                }
                continue;
            }
            model.index.insert(service.name.clone(), model.services.len());
            model.services.push(service);
        }
        model
    }

    /// Look up a service by exact name.
    #[must_use]
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.index.get(name).and_then(|&i| self.services.get(i))
    }

    /// Every service in declaration order.
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Number of services.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` when the model holds no services.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// A named API with its servers and resource tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Service {
    /// Name, optionally `@scope/name` qualified.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Maintainer note.
    pub comment: String,
    /// Servers; the first is the default.
    pub servers: Vec<Server>,
    /// Root of the resource tree. Its name and URI are empty.
    pub resource: Resource,
    /// Service links.
    pub links: Vec<Link>,
    /// Service variables.
    pub vars: Vars,
    /// Declared transport, if any.
    pub client: Option<Client>,
    /// Service credential.
    pub auth: Option<Auth>,
}

impl Service {
    /// Look up a server by exact name.
    #[must_use]
    pub fn server(&self, name: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.name == name)
    }
}

/// A base address requests can be sent to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Server {
    /// Name used for explicit selection.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Base URL; may be a URI template.
    pub base_url: String,
    /// Server headers.
    pub headers: Header,
    /// Default form fields.
    pub form: Header,
    /// Server links.
    pub links: Vec<Link>,
    /// Server variables.
    pub vars: Vars,
    /// Server credential.
    pub auth: Option<Auth>,
}

/// A node in the resource tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    /// Name matched against identifier segments.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Child resources.
    pub resources: Vec<Self>,
    /// Endpoints; never empty for bound resources.
    pub endpoints: Vec<Endpoint>,
    /// URI template segment, possibly an absolute URL.
    pub uri: String,
    /// Resource headers.
    pub headers: Header,
    /// Resource form fields.
    pub form: Header,
    /// Resource links.
    pub links: Vec<Link>,
    /// Templated body.
    pub body: Option<Value>,
    /// Raw body.
    pub raw_body: Option<Value>,
    /// Resource variables.
    pub vars: Vars,
    /// Resource credential.
    pub auth: Option<Auth>,
    /// Associated command line.
    pub command: Vec<String>,
}

impl Resource {
    /// Child resource with exactly this name.
    #[must_use]
    pub fn resource(&self, name: &str) -> Option<&Self> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Endpoint whose method matches `method`, ignoring case.
    #[must_use]
    pub fn endpoint(&self, method: &str) -> Option<&Endpoint> {
        let wanted = UncasedStr::new(method);
        self.endpoints
            .iter()
            .find(|e| UncasedStr::new(&e.method) == wanted)
    }
}

/// A single method offered by a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    /// Endpoint name.
    pub name: String,
    /// Display title.
    pub title: String,
    /// Display description.
    pub description: String,
    /// Method, e.g. `GET`.
    pub method: String,
    /// Endpoint headers.
    pub headers: Header,
    /// Endpoint form fields.
    pub form: Header,
    /// Endpoint links.
    pub links: Vec<Link>,
    /// Templated body.
    pub body: Option<Value>,
    /// Raw body.
    pub raw_body: Option<Value>,
    /// Endpoint variables.
    pub vars: Vars,
    /// Endpoint credential.
    pub auth: Option<Auth>,
}

impl Endpoint {
    /// Synthetic endpoint with only a method.
    #[must_use]
    pub fn with_method(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }
}

/// Transport used to execute a resolved request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Client {
    /// Plain HTTP.
    #[default]
    Http,
    /// gRPC with its connection options.
    Grpc(GrpcClient),
}

/// gRPC connection options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrpcClient {
    /// Skip server reflection.
    pub disable_reflection: bool,
    /// Compiled descriptor set path.
    pub proto_set: String,
    /// Connect without TLS.
    pub plaintext: bool,
}

/// Credential attached at some level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Auth {
    /// HTTP basic credentials.
    Basic(BasicAuth),
}

/// HTTP basic credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicAuth {
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
}

impl Auth {
    /// Value for an `Authorization` header.
    ///
    /// ```
    /// use apimodel::{Auth, BasicAuth};
    /// let auth = Auth::Basic(BasicAuth { user: "u".into(), password: "p".into() });
    /// assert_eq!(auth.authorization_header(), "Basic dTpw");
    /// ```
    #[must_use]
    pub fn authorization_header(&self) -> String {
        match self {
            Self::Basic(basic) => {
                let raw = format!("{}:{}", basic.user, basic.password);
                format!("Basic {}", STANDARD.encode(raw))
            }
        }
    }
}

#[cfg(test)]
mod tests;
