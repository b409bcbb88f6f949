//! CLI entrypoint for `apimodel`.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use apimodel_cli::cli::Args;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut stdout = io::stdout().lock();
    match apimodel_cli::run(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let _ignored = writeln!(io::stderr(), "apimodel: {err}");
            ExitCode::FAILURE
        }
    }
}
