//! Library interface for the `apimodel` command.
//!
//! [`run`] executes one parsed invocation against a writer so the binary and
//! the tests share the same code path.

pub mod cli;
pub mod error;
pub mod output;

use std::{
    io::{self, Read, Write},
    sync::Arc,
};

use apimodel::{
    FetchCall, Model, ModelError, Request, ServiceSpec, Vars,
    config::{Config, load_config_file},
};
use camino::Utf8PathBuf;

use crate::{
    cli::{Args, Command, RequestArgs},
    error::CliError,
    output::{ImportView, RequestView, ServiceSummary},
};

/// Load every declaration file, in order, into one model.
///
/// # Errors
///
/// Returns the first file that fails to load.
pub fn load_model(files: &[Utf8PathBuf]) -> Result<Model, CliError> {
    let mut config = Config::default();
    for path in files {
        config.push_file(load_config_file(path)?);
    }
    tracing::debug!(files = files.len(), services = config.services.len(), "loaded declarations");
    Ok(Model::new(&config))
}

/// Execute `args`, writing JSON results to `out`.
///
/// # Errors
///
/// Returns loader, resolution, validation and output failures.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<(), CliError> {
    match &args.command {
        Command::Request(request) => request_command(&args.files, request, out),
        Command::Describe { service } => {
            describe(&load_model(&args.files)?, service.as_deref(), out)
        }
        Command::Validate => {
            apimodel::validate(&load_model(&args.files)?)?;
            write_line(out, "ok")
        }
        Command::Import { snippet } => import(snippet, out),
    }
}

/// A spec whose first segment reads as an address is sent as-is; anything
/// else is resolved against the declarations.
fn request_command<W: Write>(
    files: &[Utf8PathBuf],
    args: &RequestArgs,
    out: &mut W,
) -> Result<(), CliError> {
    let spec: ServiceSpec = args.spec.parse().unwrap_or_default();
    let vars: Vars = args.vars.iter().cloned().collect();
    // Parsing drops a leading empty segment, so rooted paths are checked raw.
    let request = if args.spec.starts_with('/') || spec.looks_like_url() {
        Request::for_address(
            &args.spec,
            args.method.as_deref(),
            args.base_url.as_deref(),
            &vars,
        )?
    } else {
        let model = load_model(files)?;
        let resolved = model.resolve(&spec, args.server.as_deref(), args.method.as_deref())?;
        resolved.eval_request(args.base_url.as_deref(), &vars)?
    };
    write_json(out, &RequestView::from(&request))
}

fn describe<W: Write>(model: &Model, service: Option<&str>, out: &mut W) -> Result<(), CliError> {
    let Some(name) = service else {
        let summaries: Vec<_> = model.services().iter().map(ServiceSummary::from).collect();
        return write_json(out, &summaries);
    };
    let declaration = model
        .to_config()?
        .services
        .into_iter()
        .find(|s| s.name == name)
        .ok_or_else(|| {
            Arc::new(ModelError::ServiceNotFound {
                name: name.to_owned(),
            })
        })?;
    write_json(out, &declaration)
}

fn import<W: Write>(snippet: &str, out: &mut W) -> Result<(), CliError> {
    let text = if snippet == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| CliError::Io {
                target: "standard input",
                source,
            })?;
        buf
    } else {
        snippet.to_owned()
    };
    let call = FetchCall::parse(&text)?;
    let endpoint = call.to_endpoint();
    write_json(out, &ImportView::new(call.url, endpoint))
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)?;
    write_line(out, &text)
}

fn write_line<W: Write>(out: &mut W, text: &str) -> Result<(), CliError> {
    writeln!(out, "{text}").map_err(|source| CliError::Io {
        target: "standard output",
        source,
    })
}
