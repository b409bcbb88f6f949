//! End-to-end resolution and materialisation against the httpbin fixture.

use anyhow::{Result, ensure};
use apimodel::{
    BodyKind, Model, ModelError, ServiceSpec, Vars,
    config::{Config, Format, parse_config_str},
};
use rstest::{fixture, rstest};
use serde_json::json;
use test_helpers::fixtures;

#[fixture]
fn model() -> Model {
    let text = fixtures::httpbin().to_string();
    let file = parse_config_str(Format::Json, &text).expect("fixture parses");
    Model::new(&Config::from(file))
}

fn spec(path: &str) -> ServiceSpec {
    path.parse().unwrap_or_default()
}

fn vars(value: serde_json::Value) -> Vars {
    value.as_object().cloned().unwrap_or_default()
}

#[rstest]
fn get_materialises_without_body(model: Model) -> Result<()> {
    let resolved = model.resolve(&spec("httpbin/get"), None, None)?;
    let request = resolved.eval_request(None, &Vars::new())?;
    ensure!(request.method() == "GET");
    ensure!(request.url().as_str() == "https://httpbin.org/get");
    ensure!(request.body().is_none());
    ensure!(request.headers().is_empty());
    ensure!(request.auth().is_none());
    Ok(())
}

#[rstest]
#[case("httpbin/delete", "DELETE", "https://httpbin.org/delete")]
#[case("httpbin/patch", "PATCH", "https://httpbin.org/patch")]
#[case("httpbin/post", "POST", "https://httpbin.org/post")]
#[case("httpbin/put", "PUT", "https://httpbin.org/put")]
#[case("httpbin/status", "GET", "https://httpbin.org/status")]
#[case("httpbin", "GET", "https://httpbin.org/")]
fn default_endpoint_per_resource(
    model: Model,
    #[case] path: &str,
    #[case] method: &str,
    #[case] url: &str,
) -> Result<()> {
    let request = model
        .resolve(&spec(path), None, None)?
        .eval_request(None, &Vars::new())?;
    ensure!(request.method() == method, "method was {}", request.method());
    ensure!(request.url().as_str() == url, "url was {}", request.url());
    Ok(())
}

#[rstest]
#[case(Vars::new(), "https://httpbin.org/status/200")]
#[case(vars(json!({"codes": "418"})), "https://httpbin.org/status/418")]
#[case(vars(json!({"codes": "200,201"})), "https://httpbin.org/status/200%2C201")]
fn status_codes_expand(model: Model, #[case] caller: Vars, #[case] url: &str) -> Result<()> {
    let request = model
        .resolve(&spec("httpbin/status/codes"), None, None)?
        .eval_request(None, &caller)?;
    ensure!(request.url().as_str() == url, "url was {}", request.url());
    Ok(())
}

#[rstest]
fn named_server_and_override(model: Model) -> Result<()> {
    let resolved = model.resolve(&spec("httpbin/get"), Some("local"), None)?;
    let local = resolved.eval_request(None, &Vars::new())?;
    ensure!(local.url().as_str() == "http://localhost:8000/get");
    let overridden = resolved.eval_request(Some("https://eu.httpbin.org"), &Vars::new())?;
    ensure!(overridden.url().as_str() == "https://eu.httpbin.org/get");
    Ok(())
}

#[rstest]
fn structured_post_body(model: Model) -> Result<()> {
    let request = model
        .resolve(&spec("httpbin/post"), None, None)?
        .eval_request(None, &Vars::new())?;
    ensure!(request.headers().first("Content-Type") == Some("application/json"));
    let body = request.body().ok_or_else(|| anyhow::anyhow!("missing body"))?;
    ensure!(body.kind() == BodyKind::Structured);
    let decoded: serde_json::Value = serde_json::from_slice(body.as_bytes())?;
    ensure!(decoded == json!({"greeting": "hello world"}), "body was {decoded}");
    Ok(())
}

#[rstest]
#[case(Vars::new(), "{}")]
#[case(vars(json!({"payload": "{\"a\":1}"})), "{\"a\":1}")]
fn templated_put_body(model: Model, #[case] caller: Vars, #[case] expected: &str) -> Result<()> {
    let mut request = model
        .resolve(&spec("httpbin/put"), None, None)?
        .eval_request(None, &caller)?;
    let body = request.take_body().ok_or_else(|| anyhow::anyhow!("missing body"))?;
    ensure!(body.kind() == BodyKind::Template);
    ensure!(body.content_type().is_none());
    ensure!(body.into_bytes() == expected.as_bytes());
    Ok(())
}

#[rstest]
fn form_post_body(model: Model) -> Result<()> {
    let request = model
        .resolve(&spec("httpbin/anything"), None, Some("post"))?
        .eval_request(None, &Vars::new())?;
    let body = request.body().ok_or_else(|| anyhow::anyhow!("missing body"))?;
    ensure!(body.content_type() == Some("application/x-www-form-urlencoded"));
    ensure!(body.as_bytes() == b"name=ada&tag=a&tag=b");
    Ok(())
}

#[rstest]
#[case("httpbin/nope", None, None, "resource not found: \"httpbin/nope\"")]
#[case("httpbin/get", None, Some("POST"), "no endpoint defined for httpbin/get")]
#[case("httpbin/get", Some("staging"), None, "no server \"staging\" defined for service \"httpbin\"")]
#[case("nothing/get", None, None, "service not found: \"nothing\"")]
fn resolution_failures(
    model: Model,
    #[case] path: &str,
    #[case] server: Option<&str>,
    #[case] method: Option<&str>,
    #[case] message: &str,
) {
    let err = model
        .resolve(&spec(path), server, method)
        .expect_err("resolution must fail");
    assert_eq!(err.to_string(), message);
}

#[rstest]
fn empty_identifier_names_no_service(model: Model) {
    let err = model
        .resolve(&ServiceSpec::default(), None, None)
        .expect_err("no service");
    assert!(matches!(&*err, ModelError::NoServiceSpecified));
}

#[rstest]
fn declarations_round_trip(model: Model) -> Result<()> {
    let rebuilt = Model::new(&model.to_config()?);
    ensure!(rebuilt.services() == model.services());
    Ok(())
}

#[rstest]
fn fixture_passes_validation(model: Model) -> Result<()> {
    apimodel::validate(&model)?;
    Ok(())
}
