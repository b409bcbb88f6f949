//! Per-level views used by the merge.

use crate::{Auth, Endpoint, Header, Link, Resource, Server, Service, Vars};

/// Hierarchy level a layer was taken from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeProvenance {
    /// The selected endpoint.
    Endpoint,
    /// The targeted resource.
    Resource,
    /// A lineage resource at the given depth; the root is depth 0.
    Lineage(usize),
    /// The selected server.
    Server,
    /// The service itself.
    Service,
}

/// Attributes one hierarchy level contributes to the merge.
#[derive(Clone, Copy, Debug)]
pub struct MergeLayer<'m> {
    provenance: MergeProvenance,
    headers: Option<&'m Header>,
    vars: &'m Vars,
    links: Option<&'m [Link]>,
    auth: Option<&'m Auth>,
}

impl<'m> MergeLayer<'m> {
    /// Layer for the selected endpoint.
    #[must_use]
    pub fn endpoint(e: &'m Endpoint) -> Self {
        Self {
            provenance: MergeProvenance::Endpoint,
            headers: Some(&e.headers),
            vars: &e.vars,
            links: Some(&e.links),
            auth: e.auth.as_ref(),
        }
    }

    /// Layer for the targeted resource.
    #[must_use]
    pub fn resource(r: &'m Resource) -> Self {
        Self {
            provenance: MergeProvenance::Resource,
            ..Self::lineage(0, r)
        }
    }

    /// Layer for a lineage resource at `depth`.
    #[must_use]
    pub fn lineage(depth: usize, r: &'m Resource) -> Self {
        Self {
            provenance: MergeProvenance::Lineage(depth),
            headers: Some(&r.headers),
            vars: &r.vars,
            links: Some(&r.links),
            auth: r.auth.as_ref(),
        }
    }

    /// Layer for the selected server.
    #[must_use]
    pub fn server(s: &'m Server) -> Self {
        Self {
            provenance: MergeProvenance::Server,
            headers: Some(&s.headers),
            vars: &s.vars,
            links: Some(&s.links),
            auth: s.auth.as_ref(),
        }
    }

    /// Layer for the service; it contributes variables and credentials only.
    #[must_use]
    pub fn service(s: &'m Service) -> Self {
        Self {
            provenance: MergeProvenance::Service,
            headers: None,
            vars: &s.vars,
            links: None,
            auth: s.auth.as_ref(),
        }
    }

    /// Level this layer came from.
    #[must_use]
    pub const fn provenance(&self) -> MergeProvenance {
        self.provenance
    }

    /// Header operators, when this level carries headers.
    #[must_use]
    pub const fn headers(&self) -> Option<&'m Header> {
        self.headers
    }

    /// Declared variables.
    #[must_use]
    pub const fn vars(&self) -> &'m Vars {
        self.vars
    }

    /// Declared links, when this level carries links.
    #[must_use]
    pub const fn links(&self) -> Option<&'m [Link]> {
        self.links
    }

    /// Declared credential.
    #[must_use]
    pub const fn auth(&self) -> Option<&'m Auth> {
        self.auth
    }
}
