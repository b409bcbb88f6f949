//! Scoped services: header layering, credentials from the environment and
//! template links.

use anyhow::{Result, anyhow, ensure};
use apimodel::{
    Auth, Model, ServiceSpec, Vars,
    config::{Config, Format, parse_config_str},
};
use rstest::{fixture, rstest};
use serial_test::serial;
use test_helpers::{env, fixtures};

#[fixture]
fn model() -> Model {
    let text = fixtures::scoped().to_string();
    let file = parse_config_str(Format::Json, &text).expect("fixture parses");
    Model::new(&Config::from(file))
}

fn spec(path: &str) -> ServiceSpec {
    path.parse().unwrap_or_default()
}

#[rstest]
fn scoped_identifier_parses() {
    let parsed = spec("@acme/api.users.profile");
    assert_eq!(parsed.service_name(), Some("@acme/api"));
    assert_eq!(parsed.resource_names(), ["users", "profile"]);
    assert!(!parsed.looks_like_url());
}

#[rstest]
fn headers_follow_locate_order(model: Model) -> Result<()> {
    let request = model
        .resolve(&spec("@acme/api.users"), None, None)?
        .eval_request(None, &Vars::new())?;
    let headers = request.headers();
    ensure!(headers.first("Accept") == Some("application/json"));
    ensure!(headers.first("X-Tenant") == Some("north"));
    let trace = headers.get("X-Trace").cloned().unwrap_or_default();
    ensure!(trace == ["list", "users", "users"], "X-Trace was {trace:?}");
    Ok(())
}

#[rstest]
#[serial]
fn credentials_expand_from_environment(model: Model) -> Result<()> {
    let _password = env::set_var("ACME_PASSWORD", "hunter2");
    let request = model
        .resolve(&spec("@acme/api.users"), None, None)?
        .eval_request(None, &Vars::new())?;
    let auth = request.auth().ok_or_else(|| anyhow!("missing credential"))?;
    let Auth::Basic(basic) = auth else {
        return Err(anyhow!("unexpected credential kind"));
    };
    ensure!(basic.user == "svc-user");
    ensure!(basic.password == "hunter2");
    ensure!(auth.authorization_header() == "Basic c3ZjLXVzZXI6aHVudGVyMg==");
    Ok(())
}

#[rstest]
#[serial]
fn missing_environment_expands_empty(model: Model) -> Result<()> {
    let _password = env::remove_var("ACME_PASSWORD");
    let request = model
        .resolve(&spec("@acme/api.users"), None, None)?
        .eval_request(None, &Vars::new())?;
    let Some(Auth::Basic(basic)) = request.auth() else {
        return Err(anyhow!("missing credential"));
    };
    ensure!(basic.password.is_empty());
    Ok(())
}

#[rstest]
fn nested_uri_and_template_link(model: Model) -> Result<()> {
    let request = model
        .resolve(&spec("@acme/api.users.profile"), None, None)?
        .eval_request(None, &Vars::new())?;
    ensure!(request.url().as_str() == "https://north.acme.example/v2/users/me/profile");
    let help = request
        .links()
        .iter()
        .find(|l| l.rel == "help")
        .ok_or_else(|| anyhow!("missing help link"))?;
    ensure!(help.href == "https://north.acme.example/help/me", "href was {}", help.href);
    Ok(())
}

#[rstest]
fn caller_tenant_changes_host_and_header(model: Model) -> Result<()> {
    let caller: Vars = serde_json::from_str(r#"{"tenant": "south"}"#)?;
    let request = model
        .resolve(&spec("@acme/api.users"), None, None)?
        .eval_request(None, &caller)?;
    ensure!(request.url().as_str() == "https://south.acme.example/v2/users");
    ensure!(request.headers().first("X-Tenant") == Some("south"));
    Ok(())
}

#[rstest]
fn scoped_fixture_is_valid(model: Model) -> Result<()> {
    apimodel::validate(&model)?;
    Ok(())
}
