//! LinkChecker CLI — process entry point.
//!
//! Bridges the command line to [`linkchecker_engine::run`]: parses argv with
//! `clap`, merges in the config file, initializes `tracing`, drives the
//! engine to completion, and maps the result onto one of the four process
//! exit codes.

use std::process::ExitCode;

use clap::Parser;
use linkchecker_config::{CliArgs, ExitCode as LinkCheckerExitCode, Options};
use tracing_subscriber::EnvFilter;

fn init_tracing(debug_areas: &[String]) {
    let directives = if debug_areas.is_empty() {
        "warn".to_string()
    } else {
        // `-D area` enables debug logging scoped to that area's module path
        // rather than globally, so unrelated crates stay quiet.
        debug_areas
            .iter()
            .map(|area| format!("linkchecker_{area}=debug"))
            .collect::<Vec<_>>()
            .join(",")
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    init_tracing(&cli.debug);

    let options = match Options::resolve(cli) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("linkchecker: {err}");
            return exit_code(LinkCheckerExitCode::UsageOrConfigError);
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("linkchecker: failed to start async runtime: {err}");
            return exit_code(LinkCheckerExitCode::UsageOrConfigError);
        }
    };

    match runtime.block_on(linkchecker_engine::run(options)) {
        Ok(outcome) => {
            if outcome.interrupted {
                exit_code(LinkCheckerExitCode::Interrupted)
            } else if outcome.summary.invalid > 0 {
                exit_code(LinkCheckerExitCode::SomeInvalid)
            } else {
                exit_code(LinkCheckerExitCode::AllValid)
            }
        }
        Err(err) => {
            eprintln!("linkchecker: {err}");
            exit_code(LinkCheckerExitCode::UsageOrConfigError)
        }
    }
}

fn exit_code(code: LinkCheckerExitCode) -> ExitCode {
    ExitCode::from(code.as_i32() as u8)
}
