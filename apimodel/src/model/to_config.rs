//! Writing a model back out as declarations.

use std::sync::Arc;

use crate::{ModelError, ModelResult, config};

use super::{Auth, Client, Endpoint, Model, Resource, Server, Service};

impl Model {
    /// Convert the model back into declaration form.
    ///
    /// The root resource is implicit in declarations, so its children are
    /// written as the service's top-level resources. Rebuilding a model from
    /// the result yields an equivalent tree.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Conversion`] when an endpoint uses a method with
    /// no declaration key.
    pub fn to_config(&self) -> ModelResult<config::Config> {
        let services = self
            .services()
            .iter()
            .map(config_service)
            .collect::<ModelResult<Vec<_>>>()?;
        Ok(config::Config { services })
    }
}

fn config_service(v: &Service) -> ModelResult<config::Service> {
    let resources = v
        .resource
        .resources
        .iter()
        .map(|r| config_resource(r, &v.name))
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(config::Service {
        name: v.name.clone(),
        title: v.title.clone(),
        description: v.description.clone(),
        comment: v.comment.clone(),
        servers: v.servers.iter().map(config_server).collect(),
        resources,
        links: v.links.clone(),
        vars: v.vars.clone(),
        client: v.client.as_ref().map(config_client),
        auth: v.auth.as_ref().map(config_auth),
    })
}

fn config_server(s: &Server) -> config::Server {
    config::Server {
        name: s.name.clone(),
        title: s.title.clone(),
        description: s.description.clone(),
        base_url: s.base_url.clone(),
        headers: s.headers.clone(),
        form: s.form.clone(),
        links: s.links.clone(),
        vars: s.vars.clone(),
        auth: s.auth.as_ref().map(config_auth),
    }
}

fn config_resource(r: &Resource, parent: &str) -> ModelResult<config::Resource> {
    let path = format!("{parent}/{}", r.name);
    let mut res = config::Resource {
        name: r.name.clone(),
        title: r.title.clone(),
        description: r.description.clone(),
        uri: r.uri.clone(),
        headers: r.headers.clone(),
        form: r.form.clone(),
        links: r.links.clone(),
        body: r.body.clone(),
        raw_body: r.raw_body.clone(),
        vars: r.vars.clone(),
        auth: r.auth.as_ref().map(config_auth),
        command: r.command.clone(),
        ..config::Resource::default()
    };
    for e in &r.endpoints {
        let Some(slot) = res.endpoint_slot(&e.method) else {
            return Err(Arc::new(ModelError::Conversion {
                path,
                message: format!("custom method {:?} has no declaration key", e.method),
            }));
        };
        *slot = Some(config_endpoint(e));
    }
    res.resources = r
        .resources
        .iter()
        .map(|child| config_resource(child, &path))
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(res)
}

fn config_endpoint(e: &Endpoint) -> config::Endpoint {
    config::Endpoint {
        name: e.name.clone(),
        title: e.title.clone(),
        description: e.description.clone(),
        headers: e.headers.clone(),
        form: e.form.clone(),
        links: e.links.clone(),
        body: e.body.clone(),
        raw_body: e.raw_body.clone(),
        vars: e.vars.clone(),
        auth: e.auth.as_ref().map(config_auth),
    }
}

fn config_client(c: &Client) -> config::Client {
    match c {
        Client::Http => config::Client {
            http: Some(config::HttpClient {}),
            grpc: None,
        },
        Client::Grpc(grpc) => config::Client {
            http: None,
            grpc: Some(config::GrpcClient {
                disable_reflection: grpc.disable_reflection,
                proto_set: grpc.proto_set.clone(),
                plaintext: grpc.plaintext,
            }),
        },
    }
}

fn config_auth(a: &Auth) -> config::Auth {
    match a {
        Auth::Basic(basic) => config::Auth {
            basic: Some(config::BasicAuth {
                user: basic.user.clone(),
                password: basic.password.clone(),
            }),
        },
    }
}
