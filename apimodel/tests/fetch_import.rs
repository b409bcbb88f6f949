//! Importing a browser fetch snippet as an endpoint and materialising it.

use anyhow::{Result, anyhow, ensure};
use apimodel::{
    BodyKind, FetchCall, Model, Resource, Server, Service, ServiceSpec, Vars,
};
use rstest::rstest;

const SNIPPET: &str = r#"fetch("https://api.example.com/graphql", {
  "headers": {
    "accept": "*/*",
    "content-type": "application/json"
  },
  "body": "{\"query\":\"{ viewer { login } }\"}",
  "method": "POST",
  "mode": "cors",
  "credentials": "include"
});"#;

fn service_with(endpoint: apimodel::Endpoint, base: &str) -> Service {
    let graphql = Resource {
        name: "graphql".into(),
        uri: "graphql".into(),
        endpoints: vec![endpoint],
        ..Resource::default()
    };
    Service {
        name: "imported".into(),
        servers: vec![Server {
            name: "default".into(),
            base_url: base.into(),
            ..Server::default()
        }],
        resource: Resource {
            resources: vec![graphql],
            endpoints: vec![apimodel::Endpoint::with_method("GET")],
            ..Resource::default()
        },
        ..Service::default()
    }
}

#[rstest]
fn imported_endpoint_materialises() -> Result<()> {
    let call: FetchCall = SNIPPET.parse()?;
    ensure!(call.url == "https://api.example.com/graphql");
    let endpoint = call.to_endpoint();
    let model = Model::from_services([service_with(endpoint, "https://api.example.com/")]);

    let spec: ServiceSpec = "imported/graphql".parse().unwrap_or_default();
    let request = model
        .resolve(&spec, None, Some("post"))?
        .eval_request(None, &Vars::new())?;
    ensure!(request.method() == "POST");
    ensure!(request.url().as_str() == call.url);
    ensure!(request.headers().first("Content-Type") == Some("application/json"));
    ensure!(request.headers().first("Accept") == Some("*/*"));

    let body = request.body().ok_or_else(|| anyhow!("missing body"))?;
    ensure!(body.kind() == BodyKind::Structured);
    let decoded: serde_json::Value = serde_json::from_slice(body.as_bytes())?;
    ensure!(decoded == serde_json::json!({"query": "{ viewer { login } }"}));
    Ok(())
}

#[rstest]
#[case("fetch('https://x', {})", "fetch URL must be a quoted string")]
#[case("curl https://x", "expression is not a fetch(...) call")]
fn rejects_non_browser_snippets(#[case] input: &str, #[case] reason: &str) {
    let err = FetchCall::parse(input).expect_err("unsupported snippet");
    assert!(err.to_string().ends_with(reason), "{err}");
}
