//! Subcommand implementations.

mod status;

use std::io::Write;

use anyhow::Context;
pub use status::status;
use sweep_core::crypto::EncryptionKey;
use sweep_job::{SubmitOutcome, ValidationErrors};

use crate::TRACING_TARGET_COMMAND;
use crate::config::{Cli, SubmitArgs};

/// Prints the display form and its warnings as JSON.
pub fn show(cli: &Cli) -> anyhow::Result<()> {
    let loaded = cli
        .controller()
        .load()
        .context("failed to load configuration")?;

    print_json(&loaded)
}

/// Validates the submitted values and saves them if valid.
///
/// Returns 1 if the submission was rejected.
pub async fn submit(cli: &Cli, args: &SubmitArgs) -> anyhow::Result<i32> {
    let controller = cli.controller();

    let base = match args.read_form()? {
        Some(form) => form,
        None => {
            controller
                .load()
                .context("failed to load configuration")?
                .form
        }
    };
    let form = args.apply(base);

    if args.dry_run {
        let errors = controller
            .validate(&form)
            .await
            .context("failed to validate configuration")?;
        return Ok(report(&errors, "valid"));
    }

    let outcome = controller
        .submit(&form)
        .await
        .context("failed to save configuration")?;

    match outcome {
        SubmitOutcome::Persisted(configuration) => {
            tracing::debug!(
                target: TRACING_TARGET_COMMAND,
                enabled = configuration.enabled,
                "Submission persisted"
            );
            Ok(report(&ValidationErrors::new(), "persisted"))
        }
        SubmitOutcome::Rejected(errors) => Ok(report(&errors, "persisted")),
    }
}

/// Prints a new random base64 key.
pub fn keygen() -> anyhow::Result<()> {
    let key = EncryptionKey::generate();
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", key.to_base64()).context("failed to write key")
}

/// Prints `success` or every field error; returns the exit code.
fn report(errors: &ValidationErrors, success: &str) -> i32 {
    if errors.is_empty() {
        println!("{success}");
        return 0;
    }

    for line in error_lines(errors) {
        eprintln!("{line}");
    }
    1
}

fn error_lines(errors: &ValidationErrors) -> Vec<String> {
    errors
        .iter()
        .map(|error| format!("{}: {}", error.field, error.kind))
        .collect()
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{text}");
    Ok(())
}
