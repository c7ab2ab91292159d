//! Scheduler-side status summary.

use anyhow::Context;
use serde::Serialize;
use sweep_core::ErrorKind;
use sweep_job::{JobConfiguration, ScheduledJob};

use super::print_json;
use crate::TRACING_TARGET_COMMAND;
use crate::config::Cli;

/// Whether the stored secret is usable by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SecretStatus {
    Resolved,
    Absent,
    Unreadable,
}

/// What the scheduler would run with; never includes the secret.
#[derive(Debug, Serialize)]
struct StatusReport {
    enabled: bool,
    runnable: bool,
    frequency_seconds: Option<u64>,
    bucket_name: String,
    access_key: String,
    object_key_prefix: String,
    success_recipients: Vec<String>,
    failure_recipients: Vec<String>,
    secret: SecretStatus,
}

impl From<ScheduledJob> for StatusReport {
    fn from(job: ScheduledJob) -> Self {
        Self {
            enabled: job.enabled,
            runnable: job.is_runnable(),
            frequency_seconds: job.frequency.map(|f| f.seconds()),
            secret: match job.secret_key {
                Some(_) => SecretStatus::Resolved,
                None => SecretStatus::Absent,
            },
            bucket_name: job.bucket_name,
            access_key: job.access_key,
            object_key_prefix: job.object_key_prefix,
            success_recipients: job.success_recipients,
            failure_recipients: job.failure_recipients,
        }
    }
}

impl StatusReport {
    /// Builds a report for a record whose secret cannot be decrypted.
    fn unreadable(configuration: JobConfiguration) -> Self {
        Self {
            enabled: configuration.enabled,
            runnable: false,
            frequency_seconds: configuration.frequency.map(|f| f.seconds()),
            success_recipients: configuration.success_recipients(),
            failure_recipients: configuration.failure_recipients(),
            bucket_name: configuration.storage.bucket_name,
            access_key: configuration.storage.access_key,
            object_key_prefix: configuration.storage.object_key_prefix,
            secret: SecretStatus::Unreadable,
        }
    }
}

/// Prints the scheduler-side summary as JSON.
pub fn status(cli: &Cli) -> anyhow::Result<()> {
    let report = match cli.reader().current() {
        Ok(job) => StatusReport::from(job),
        Err(err) if err.kind() == ErrorKind::DecryptionFailed => {
            tracing::warn!(
                target: TRACING_TARGET_COMMAND,
                error = %err,
                "Stored secret key is unreadable"
            );
            let configuration = cli
                .controller()
                .configuration()
                .context("failed to read configuration")?;
            StatusReport::unreadable(configuration)
        }
        Err(err) => return Err(err).context("failed to read configuration"),
    };

    print_json(&report)
}
