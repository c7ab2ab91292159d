//! Form fields accepted by `sweep submit`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sweep_job::DisplayForm;

/// Values to submit.
///
/// Unset flags keep the value from `--form`, or from the current
/// configuration when no form file is given. The secret stays redacted
/// unless `--secret-key` is passed.
#[derive(Debug, Clone, Default, Args)]
pub struct SubmitArgs {
    /// JSON file with the complete form
    #[arg(long = "form")]
    pub form: Option<PathBuf>,

    /// Whether the job runs
    #[arg(long = "enabled")]
    pub enabled: Option<bool>,

    /// Run frequency in minutes; empty or 0 unsets it
    #[arg(long = "frequency")]
    pub frequency_minutes: Option<String>,

    /// Comma-separated addresses notified on success
    #[arg(long = "email-on-success")]
    pub email_on_success: Option<String>,

    /// Comma-separated addresses notified on failure
    #[arg(long = "email-on-failure")]
    pub email_on_failure: Option<String>,

    /// Target bucket
    #[arg(long = "bucket-name")]
    pub bucket_name: Option<String>,

    /// Storage access key id
    #[arg(long = "access-key")]
    pub access_key: Option<String>,

    /// New storage secret key
    #[arg(long = "secret-key", env = "SWEEP_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Prefix for written object keys
    #[arg(long = "object-key-prefix")]
    pub object_key_prefix: Option<String>,

    /// Validate without saving
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl SubmitArgs {
    /// Reads the `--form` file, if one was given.
    pub fn read_form(&self) -> anyhow::Result<Option<DisplayForm>> {
        let Some(path) = &self.form else {
            return Ok(None);
        };

        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read form file {}", path.display()))?;
        let form = serde_json::from_slice(&bytes)
            .with_context(|| format!("invalid form file {}", path.display()))?;
        Ok(Some(form))
    }

    /// Applies the flags on top of `base`.
    pub fn apply(&self, mut base: DisplayForm) -> DisplayForm {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }

        if let Some(enabled) = self.enabled {
            base.enabled = enabled;
        }
        set(&mut base.frequency_minutes, &self.frequency_minutes);
        set(&mut base.email_on_success, &self.email_on_success);
        set(&mut base.email_on_failure, &self.email_on_failure);
        set(&mut base.bucket_name, &self.bucket_name);
        set(&mut base.access_key, &self.access_key);
        set(&mut base.secret_key, &self.secret_key);
        set(&mut base.object_key_prefix, &self.object_key_prefix);
        base
    }
}
