//! One-time transform from declarations into the model tree.

use crate::config;

use super::{
    Auth, BasicAuth, Client, Endpoint, GrpcClient, Model, Resource, Server, Service,
};

impl Model {
    /// Build a model from accumulated declarations.
    ///
    /// Every service gets a root resource with an empty name and URI holding
    /// the declared top-level resources. Resources that declare no endpoint
    /// gain a single synthetic `GET`.
    #[must_use]
    pub fn new(config: &config::Config) -> Self {
        Self::from_services(config.services.iter().map(Service::from))
    }
}

impl From<&config::Service> for Service {
    fn from(v: &config::Service) -> Self {
        Self {
            name: v.name.clone(),
            title: v.title.clone(),
            description: v.description.clone(),
            comment: v.comment.clone(),
            servers: v.servers.iter().map(Server::from).collect(),
            resource: Resource {
                resources: v.resources.iter().map(Resource::from).collect(),
                endpoints: vec![Endpoint::with_method("GET")],
                ..Resource::default()
            },
            links: v.links.clone(),
            vars: v.vars.clone(),
            client: v.client.as_ref().and_then(client),
            auth: v.auth.as_ref().and_then(auth),
        }
    }
}

impl From<&config::Server> for Server {
    fn from(s: &config::Server) -> Self {
        Self {
            name: s.name.clone(),
            title: s.title.clone(),
            description: s.description.clone(),
            base_url: s.base_url.clone(),
            headers: s.headers.clone(),
            form: s.form.clone(),
            links: s.links.clone(),
            vars: s.vars.clone(),
            auth: s.auth.as_ref().and_then(auth),
        }
    }
}

impl From<&config::Resource> for Resource {
    fn from(r: &config::Resource) -> Self {
        let mut endpoints: Vec<Endpoint> = r
            .endpoints()
            .into_iter()
            .filter_map(|(method, ep)| ep.map(|e| endpoint(method, e)))
            .collect();
        if endpoints.is_empty() {
            endpoints.push(Endpoint::with_method("GET"));
        }
        Self {
            name: r.name.clone(),
            title: r.title.clone(),
            description: r.description.clone(),
            resources: r.resources.iter().map(Self::from).collect(),
            endpoints,
            uri: r.uri.clone(),
            headers: r.headers.clone(),
            form: r.form.clone(),
            links: r.links.clone(),
            body: non_null(r.body.as_ref()),
            raw_body: non_null(r.raw_body.as_ref()),
            vars: r.vars.clone(),
            auth: r.auth.as_ref().and_then(auth),
            command: r.command.clone(),
        }
    }
}

fn endpoint(method: &str, e: &config::Endpoint) -> Endpoint {
    Endpoint {
        name: e.name.clone(),
        title: e.title.clone(),
        description: e.description.clone(),
        method: method.to_owned(),
        headers: e.headers.clone(),
        form: e.form.clone(),
        links: e.links.clone(),
        body: non_null(e.body.as_ref()),
        raw_body: non_null(e.raw_body.as_ref()),
        vars: e.vars.clone(),
        auth: e.auth.as_ref().and_then(auth),
    }
}

fn non_null(value: Option<&serde_json::Value>) -> Option<serde_json::Value> {
    value.filter(|v| !v.is_null()).cloned()
}

fn client(c: &config::Client) -> Option<Client> {
    if let Some(grpc) = &c.grpc {
        return Some(Client::Grpc(GrpcClient {
            disable_reflection: grpc.disable_reflection,
            proto_set: grpc.proto_set.clone(),
            plaintext: grpc.plaintext,
        }));
    }
    c.http.as_ref().map(|_| Client::Http)
}

fn auth(a: &config::Auth) -> Option<Auth> {
    a.basic.as_ref().map(|b| {
        Auth::Basic(BasicAuth {
            user: b.user.clone(),
            password: b.password.clone(),
        })
    })
}
