//! Command-line interface definitions for `apimodel`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde_json::Value;

/// Parsed CLI arguments for `apimodel`.
#[derive(Debug, Parser)]
#[command(name = "apimodel")]
#[command(about = "Resolve declared API services into concrete requests")]
#[command(version)]
pub struct Args {
    /// Declaration file to load (repeat to load several, later files win).
    #[arg(long = "file", short = 'f', value_name = "path", global = true)]
    pub files: Vec<Utf8PathBuf>,
    /// Action to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands understood by `apimodel`.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the request an identifier resolves to.
    Request(RequestArgs),
    /// List services, or print one service's declaration.
    Describe {
        /// Service to print.
        service: Option<String>,
    },
    /// Check every name in the loaded declarations.
    Validate,
    /// Convert a browser "copy as fetch" snippet into an endpoint.
    Import {
        /// Snippet text, or `-` to read it from standard input.
        snippet: String,
    },
}

/// Arguments for `apimodel request`.
#[derive(Debug, ClapArgs)]
pub struct RequestArgs {
    /// Identifier such as `httpbin/status/codes` or `@scope/name.resource`.
    pub spec: String,
    /// Server to use instead of the service's first one.
    #[arg(long, value_name = "name")]
    pub server: Option<String>,
    /// Endpoint method to select.
    #[arg(long, short = 'X', value_name = "method")]
    pub method: Option<String>,
    /// Base URL replacing the server's.
    #[arg(long, value_name = "url")]
    pub base_url: Option<String>,
    /// Variable binding; the value is read as JSON when it parses.
    #[arg(long = "var", short = 'v', value_name = "name=value", value_parser = parse_var)]
    pub vars: Vec<(String, Value)>,
}

/// Parse a `name=value` binding.
///
/// # Errors
///
/// Returns a message when `=` is missing or the name is empty.
pub fn parse_var(raw: &str) -> Result<(String, Value), String> {
    let (name, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got {raw:?}"))?;
    if name.is_empty() {
        return Err(format!("missing variable name in {raw:?}"));
    }
    let value =
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()));
    Ok((name.to_owned(), value))
}
