//! Drives the CLI through `run` with declaration files in a scratch directory.

use anyhow::{Context, Result, ensure};
use apimodel_cli::{cli::Args, error::CliError, run};
use camino::Utf8PathBuf;
use clap::Parser;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;
use test_helpers::fixtures;

struct Workspace {
    _dir: TempDir,
    httpbin: Utf8PathBuf,
    catalogue: Utf8PathBuf,
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    let httpbin = root.join("httpbin.json");
    let catalogue = root.join("catalogue.json");
    std::fs::write(&httpbin, fixtures::httpbin().to_string()).expect("write httpbin");
    std::fs::write(&catalogue, fixtures::catalogue().to_string()).expect("write catalogue");
    Workspace {
        _dir: dir,
        httpbin,
        catalogue,
    }
}

fn invoke(argv: &[&str]) -> Result<Value, CliError> {
    let args = Args::try_parse_from(std::iter::once("apimodel").chain(argv.iter().copied()))
        .expect("valid arguments");
    let mut out = Vec::new();
    run(&args, &mut out)?;
    let text = String::from_utf8(out).expect("utf-8 output");
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text.trim().to_owned())))
}

#[rstest]
fn request_prints_materialised_request(workspace: Workspace) -> Result<()> {
    let out = invoke(&[
        "request",
        "httpbin/status/codes",
        "-f",
        workspace.httpbin.as_str(),
        "-v",
        "codes=404",
    ])?;
    ensure!(out["method"] == "GET", "{out}");
    ensure!(out["url"] == "https://httpbin.org/status/404", "{out}");
    ensure!(out["client"] == "http", "{out}");
    ensure!(out.get("body").is_none(), "{out}");
    Ok(())
}

#[rstest]
fn request_includes_body_and_content_type(workspace: Workspace) -> Result<()> {
    let out = invoke(&[
        "request",
        "httpbin/anything",
        "-X",
        "POST",
        "--var",
        "who=grace",
        "--file",
        workspace.httpbin.as_str(),
    ])?;
    ensure!(out["contentType"] == "application/x-www-form-urlencoded", "{out}");
    ensure!(out["body"] == "name=grace&tag=a&tag=b", "{out}");
    Ok(())
}

#[rstest]
fn describe_lists_services_across_files(workspace: Workspace) -> Result<()> {
    let out = invoke(&[
        "describe",
        "-f",
        workspace.httpbin.as_str(),
        "-f",
        workspace.catalogue.as_str(),
    ])?;
    let names: Vec<_> = out
        .as_array()
        .context("summary list")?
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    ensure!(names == ["httpbin", "alpha", "beta"], "{names:?}");
    Ok(())
}

#[rstest]
fn describe_prints_one_declaration(workspace: Workspace) -> Result<()> {
    let out = invoke(&["describe", "alpha", "-f", workspace.catalogue.as_str()])?;
    ensure!(out["name"] == "alpha", "{out}");
    ensure!(out["servers"][0]["baseUrl"] == "https://alpha.example/", "{out}");
    ensure!(out["resources"][0]["name"] == "ping", "{out}");
    Ok(())
}

#[rstest]
fn validate_reports_ok(workspace: Workspace) -> Result<()> {
    let out = invoke(&["validate", "-f", workspace.httpbin.as_str()])?;
    ensure!(out == json!("ok"), "{out}");
    Ok(())
}

#[rstest]
fn import_converts_snippet() -> Result<()> {
    let out = invoke(&[
        "import",
        r#"fetch("https://x.example/api", {"method": "post", "body": "{\"a\":1}"})"#,
    ])?;
    ensure!(out["url"] == "https://x.example/api", "{out}");
    ensure!(out["method"] == "POST", "{out}");
    ensure!(out["body"] == json!({"a": 1}), "{out}");
    Ok(())
}

#[rstest]
#[case(&["request", "nope/get"], "service not found: \"nope\"")]
#[case(&["describe", "nope"], "service not found: \"nope\"")]
#[case(&["import", "curl x"], "invalid fetch call: expression is not a fetch(...) call")]
fn failures_surface_model_errors(
    workspace: Workspace,
    #[case] argv: &[&str],
    #[case] message: &str,
) {
    let mut full: Vec<&str> = argv.to_vec();
    full.extend(["-f", workspace.httpbin.as_str()]);
    let err = invoke(&full).expect_err("command must fail");
    assert_eq!(err.to_string(), message);
}

#[rstest]
#[case(&["request", "https://api.example/things", "-X", "put"], "PUT", "https://api.example/things")]
#[case(&["request", "localhost:8000/get"], "GET", "http://localhost:8000/get")]
#[case(
    &["request", "/status/{code}", "--base-url", "https://httpbin.org/", "-v", "code=418"],
    "GET",
    "https://httpbin.org/status/418"
)]
fn literal_addresses_skip_declarations(
    #[case] argv: &[&str],
    #[case] method: &str,
    #[case] url: &str,
) -> Result<()> {
    let mut full: Vec<&str> = argv.to_vec();
    full.extend(["-f", "/definitely/not/here.json"]);
    let out = invoke(&full)?;
    ensure!(out["method"] == method, "{out}");
    ensure!(out["url"] == url, "{out}");
    ensure!(out["headers"] == json!({}), "{out}");
    Ok(())
}

#[rstest]
fn missing_file_is_reported() {
    let err = invoke(&["validate", "-f", "/definitely/not/here.json"]).expect_err("missing file");
    assert!(err.to_string().contains("/definitely/not/here.json"), "{err}");
}
