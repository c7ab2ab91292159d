#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod commands;
mod config;

use std::process;

use anyhow::Context;

use crate::config::{Cli, Command};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "sweep_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "sweep_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "sweep_cli::command";

#[tokio::main]
async fn main() {
    process::exit(exit_code(run().await));
}

/// Reports a failed run and maps the outcome to a process exit code.
///
/// Errors go through tracing when it is enabled, and to stderr otherwise.
fn exit_code(result: anyhow::Result<i32>) -> i32 {
    let error = match result {
        Ok(code) => return code,
        Err(error) => error,
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    1
}

/// Main application entry point.
///
/// Returns the process exit code; a rejected submission exits with 1.
async fn run() -> anyhow::Result<i32> {
    let cli = Cli::init();

    Cli::init_tracing().context("failed to initialize tracing")?;
    cli.log();

    match &cli.command {
        Command::Show => commands::show(&cli).map(|()| 0),
        Command::Submit(args) => commands::submit(&cli, args).await,
        Command::Status => commands::status(&cli).map(|()| 0),
        Command::Keygen => commands::keygen().map(|()| 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(Ok(0)), 0);
        assert_eq!(exit_code(Ok(1)), 1);
        assert_eq!(exit_code(Err(anyhow::anyhow!("store unreadable"))), 1);
    }
}
