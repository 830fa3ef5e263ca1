use std::process::ExitCode;

use clap::Parser;
use nupkg_install::{ConfigurationError, ErrorKind};
use tracing_subscriber::EnvFilter;

mod cli;

const VERBOSE_FILTER: &str = "warn,nupkg=debug,nupkg_install=debug,nupkg_archive=debug,nupkg_fs=debug";

fn main() -> ExitCode {
    let app = match cli::App::try_parse() {
        Ok(app) => app,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            println!("{}", cli::usage_error(&e));
            return ExitCode::from(2);
        }
    };
    init_tracing(app.verbose);
    tracing::debug!(?app, "starting");

    match app.run() {
        Ok(message) => {
            println!("{message}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", render(&e));
            exit_code(&e)
        }
    }
}

/// Logs go to stderr; stdout carries only the result line.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { VERBOSE_FILTER } else { "warn" }));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn render(e: &anyhow::Error) -> String {
    match e.downcast_ref::<nupkg_install::Error>() {
        Some(err) => err.to_string(),
        None => format!("{e:#}"),
    }
}

fn exit_code(e: &anyhow::Error) -> ExitCode {
    let configuration = e.is::<ConfigurationError>()
        || e
            .downcast_ref::<nupkg_install::Error>()
            .is_some_and(|err| err.kind() == ErrorKind::Configuration);
    if configuration { ExitCode::from(2) } else { ExitCode::FAILURE }
}
