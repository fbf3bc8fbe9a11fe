//! cjob - run ad-hoc batch jobs on tagged EC2 instances

use std::process::ExitCode;

use clap::Parser;
use cjob_cli::cli::Cli;
use cjob_cli::domain::error::ConfigError;
use cjob_cli::output::json;
use cjob_common::NameError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cjob_cli=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let as_json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            report(&e, as_json);
            ExitCode::FAILURE
        }
    }
}

/// Print a failure. Input errors get one line; anything else gets the
/// full context chain.
fn report(e: &anyhow::Error, as_json: bool) {
    let code = if e.downcast_ref::<ConfigError>().is_some() {
        "config"
    } else if e.downcast_ref::<NameError>().is_some() {
        "name"
    } else {
        "error"
    };

    if as_json {
        if let Ok(text) = json::format_error(&format!("{e:#}"), code) {
            println!("{text}");
            return;
        }
    }
    if code == "error" {
        eprintln!("Error: {e:?}");
    } else {
        eprintln!("Error: {e}");
    }
}
