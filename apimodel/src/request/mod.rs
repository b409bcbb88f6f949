//! Materialising a resolved resource into a concrete request.
//!
//! [`ResolvedResource::eval_request`] combines the hierarchy, expands
//! placeholders against the combined variables, composes the URL and picks
//! the body. The result is a plain value; sending it is left to a transport.

mod body;
mod url;

pub use self::body::{Body, BodyKind, FORM_CONTENT_TYPE, JSON_CONTENT_TYPE};
pub use self::url::resolve_url;

use ::url::Url;

use self::body::{BodySource, select_body};
use crate::{
    Auth, BasicAuth, Client, Header, Link, ModelResult, ResolvedResource, Vars,
    expand::{Expander, Lookup, expand_header, expand_string},
    identifier::has_url_scheme,
    merge::overlay_vars,
};

/// A fully expanded request ready for a transport.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    url: Url,
    headers: Header,
    links: Vec<Link>,
    auth: Option<Auth>,
    vars: Vars,
    client: Client,
    body: Option<Body>,
}

impl Request {
    /// Method of the selected endpoint.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Absolute target URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Combined and expanded headers.
    #[must_use]
    pub const fn headers(&self) -> &Header {
        &self.headers
    }

    /// Links from every level, expanded.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Effective credential, if any level declares one.
    #[must_use]
    pub const fn auth(&self) -> Option<&Auth> {
        self.auth.as_ref()
    }

    /// Variables the request was expanded with.
    #[must_use]
    pub const fn vars(&self) -> &Vars {
        &self.vars
    }

    /// Transport the service asks for.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// The body, if one was selected.
    #[must_use]
    pub const fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Take the body out, leaving `None` behind.
    pub const fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }

    /// Request to a literal address given in place of a service name.
    ///
    /// `address` may be a URI template expanded against `vars`. Without a
    /// scheme it is taken as `http://`, except that a path starting with `/`
    /// is resolved against `base_url`. An empty `method` means `GET`.
    ///
    /// ```
    /// use apimodel::{Request, Vars};
    ///
    /// let request = Request::for_address("localhost:8000/get", Some("post"), None, &Vars::new())?;
    /// assert_eq!(request.method(), "POST");
    /// assert_eq!(request.url().as_str(), "http://localhost:8000/get");
    /// # Ok::<(), std::sync::Arc<apimodel::ModelError>>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Fails when the address is a malformed template or does not compose
    /// into a URL.
    pub fn for_address(
        address: &str,
        method: Option<&str>,
        base_url: Option<&str>,
        vars: &Vars,
    ) -> ModelResult<Self> {
        let target = if has_url_scheme(address) || address.starts_with('/') {
            address.to_owned()
        } else {
            format!("http://{address}")
        };
        let url = resolve_url(base_url.unwrap_or_default(), [target.as_str()], vars)?;
        let method = method
            .filter(|m| !m.is_empty())
            .map_or_else(|| "GET".to_owned(), str::to_ascii_uppercase);
        tracing::debug!(method = %method, url = %url, "literal address request");
        Ok(Self {
            method,
            url,
            headers: Header::new(),
            links: Vec::new(),
            auth: None,
            vars: vars.clone(),
            client: Client::Http,
            body: None,
        })
    }
}

fn expand_link(link: &Link, lookup: &dyn Lookup) -> Link {
    Link {
        href: expand_string(&link.href, lookup),
        href_lang: expand_string(&link.href_lang, lookup),
        audience: expand_string(&link.audience, lookup),
        rel: expand_string(&link.rel, lookup),
        title: expand_string(&link.title, lookup),
        media_type: expand_string(&link.media_type, lookup),
        is_template: link.is_template,
    }
}

fn expand_auth(auth: &Auth, lookup: &dyn Lookup) -> Auth {
    match auth {
        Auth::Basic(basic) => Auth::Basic(BasicAuth {
            user: expand_string(&basic.user, lookup),
            password: expand_string(&basic.password, lookup),
        }),
    }
}

impl ResolvedResource<'_> {
    /// Build the request for this resolution.
    ///
    /// `base_url` overrides the server's base URL when non-empty. `vars` are
    /// laid over the combined variables and win over every declared level.
    ///
    /// Template links are resolved against the base URL with the same rules
    /// as the request URL; every other link field is placeholder-expanded.
    ///
    /// # Errors
    ///
    /// Fails when a URI template or body template is malformed, when the
    /// composed URL does not parse, or when a body cannot be encoded.
    pub fn eval_request(&self, base_url: Option<&str>, vars: &Vars) -> ModelResult<Request> {
        let base = base_url
            .filter(|b| !b.is_empty())
            .unwrap_or(self.server().base_url.as_str());

        let mut combined = self.combined_vars();
        overlay_vars(&mut combined, vars);
        let expander = Expander::new(&combined);

        let headers = expand_header(&self.combined_headers(), &expander);
        let links = self
            .combined_links()
            .iter()
            .map(|link| -> ModelResult<Link> {
                if !link.is_template {
                    return Ok(expand_link(link, &expander));
                }
                let href = resolve_url(base, [link.href.as_str()], &combined)?;
                Ok(Link {
                    href: href.into(),
                    ..expand_link(link, &expander)
                })
            })
            .collect::<ModelResult<Vec<_>>>()?;
        let auth = self
            .combined_auth()
            .map(|auth| expand_auth(&auth, &expander));

        let url = resolve_url(
            base,
            self.lineage().iter().map(|r| r.uri.as_str()),
            &combined,
        )?;
        let body = select_body(
            &[
                BodySource::from(self.endpoint()),
                BodySource::from(self.resource()),
            ],
            &self.server().form,
            &combined,
        )?;
        let client = self.service().client.clone().unwrap_or_default();
        let method = self.endpoint().method.clone();

        tracing::debug!(
            method = %method,
            url = %url,
            has_body = body.is_some(),
            "materialised request"
        );
        Ok(Request {
            method,
            url,
            headers,
            links,
            auth,
            vars: combined,
            client,
            body,
        })
    }
}
