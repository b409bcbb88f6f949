//! Walking an identifier through the resource tree.

use std::sync::Arc;

use crate::{
    Endpoint, Model, ModelError, ModelResult, Resource, Server, Service, ServiceSpec,
};

/// One service, server, resource lineage and endpoint selected for a single
/// request.
///
/// The view borrows from the [`Model`] it was resolved against and holds no
/// state of its own beyond the selection.
#[derive(Debug, Clone)]
pub struct ResolvedResource<'m> {
    spec: ServiceSpec,
    service: &'m Service,
    server: &'m Server,
    lineage: Vec<&'m Resource>,
    endpoint: &'m Endpoint,
}

impl<'m> ResolvedResource<'m> {
    /// Identifier this view was resolved from.
    #[must_use]
    pub const fn spec(&self) -> &ServiceSpec {
        &self.spec
    }

    /// Selected service.
    #[must_use]
    pub const fn service(&self) -> &'m Service {
        self.service
    }

    /// Selected server.
    #[must_use]
    pub const fn server(&self) -> &'m Server {
        self.server
    }

    /// Resources visited from the root to the target, root included.
    #[must_use]
    pub fn lineage(&self) -> &[&'m Resource] {
        &self.lineage
    }

    /// The targeted (leaf) resource.
    #[must_use]
    pub fn resource(&self) -> &'m Resource {
        let service: &'m Service = self.service;
        self.lineage.last().copied().unwrap_or(&service.resource)
    }

    /// Selected endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &'m Endpoint {
        self.endpoint
    }
}

impl Model {
    /// Resolve `spec` to a service, server, resource lineage and endpoint.
    ///
    /// `server` and `method` are optional overrides; `None` or an empty
    /// string selects the first declared server or endpoint. An unknown
    /// method is logged and then reported as [`ModelError::NoEndpointDefined`].
    ///
    /// # Errors
    ///
    /// Returns the first failure met while walking the identifier:
    /// [`ModelError::NoServiceSpecified`], [`ModelError::ServiceNotFound`],
    /// [`ModelError::NoServersDefined`], [`ModelError::ServerNotFound`],
    /// [`ModelError::ResourceNotFound`] or [`ModelError::NoEndpointDefined`].
    pub fn resolve(
        &self,
        spec: &ServiceSpec,
        server: Option<&str>,
        method: Option<&str>,
    ) -> ModelResult<ResolvedResource<'_>> {
        let name = spec
            .service_name()
            .ok_or_else(|| Arc::new(ModelError::NoServiceSpecified))?;
        let service = self.service(name).ok_or_else(|| {
            Arc::new(ModelError::ServiceNotFound {
                name: name.to_owned(),
            })
        })?;
        let server = select_server(service, server.filter(|s| !s.is_empty()))?;

        let mut lineage = vec![&service.resource];
        let mut current = &service.resource;
        for (i, segment) in spec.resource_names().iter().enumerate() {
            current = current.resource(segment).ok_or_else(|| {
                Arc::new(ModelError::ResourceNotFound {
                    path: spec.truncated(i + 2).path(),
                })
            })?;
            lineage.push(current);
        }

        let endpoint = select_endpoint(current, method.filter(|m| !m.is_empty()), spec)
            .ok_or_else(|| {
                Arc::new(ModelError::NoEndpointDefined { path: spec.path() })
            })?;
        tracing::debug!(
            path = %spec,
            server = %server.name,
            method = %endpoint.method,
            "resolved resource"
        );
        Ok(ResolvedResource {
            spec: spec.clone(),
            service,
            server,
            lineage,
            endpoint,
        })
    }
}

fn select_server<'m>(service: &'m Service, name: Option<&str>) -> ModelResult<&'m Server> {
    let Some(first) = service.servers.first() else {
        return Err(Arc::new(ModelError::NoServersDefined {
            service: service.name.clone(),
        }));
    };
    let Some(wanted) = name else {
        return Ok(first);
    };
    service.server(wanted).ok_or_else(|| {
        Arc::new(ModelError::ServerNotFound {
            server: wanted.to_owned(),
            service: service.name.clone(),
        })
    })
}

fn select_endpoint<'m>(
    resource: &'m Resource,
    method: Option<&str>,
    spec: &ServiceSpec,
) -> Option<&'m Endpoint> {
    let Some(wanted) = method else {
        return resource.endpoints.first();
    };
    let found = resource.endpoint(wanted);
    if found.is_none() {
        tracing::warn!(
            method = wanted,
            path = %spec,
            "method is not defined for resource"
        );
    }
    found
}
