//! JSON views written to standard output.

use std::collections::BTreeMap;

use apimodel::{Client, Endpoint, Link, Request, Service};
use serde::Serialize;
use serde_json::Value;

/// A materialised request as printed by `apimodel request`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestView {
    method: String,
    url: String,
    client: &'static str,
    headers: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    authorization: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    links: Vec<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<String>,
}

impl From<&Request> for RequestView {
    fn from(request: &Request) -> Self {
        let client = match request.client() {
            Client::Http => "http",
            Client::Grpc(_) => "grpc",
        };
        Self {
            method: request.method().to_owned(),
            url: request.url().to_string(),
            client,
            headers: request.headers().clone().into_inner(),
            authorization: request.auth().map(apimodel::Auth::authorization_header),
            links: request.links().to_vec(),
            content_type: request.body().and_then(apimodel::Body::content_type),
            body: request
                .body()
                .map(|b| String::from_utf8_lossy(b.as_bytes()).into_owned()),
        }
    }
}

/// One line of `apimodel describe` without arguments.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    title: String,
    servers: Vec<String>,
    resources: Vec<String>,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            name: service.name.clone(),
            title: service.title.clone(),
            servers: service.servers.iter().map(|s| s.name.clone()).collect(),
            resources: service
                .resource
                .resources
                .iter()
                .map(|r| r.name.clone())
                .collect(),
        }
    }
}

/// Endpoint imported from a fetch snippet.
#[derive(Debug, Serialize)]
pub struct ImportView {
    url: String,
    method: String,
    headers: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
}

impl ImportView {
    /// Pair the snippet's URL with the endpoint built from it.
    #[must_use]
    pub fn new(url: String, endpoint: Endpoint) -> Self {
        Self {
            url,
            method: endpoint.method,
            headers: endpoint.headers.into_inner(),
            body: endpoint.body,
        }
    }
}
