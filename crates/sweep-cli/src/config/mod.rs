//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── store: StoreConfig          # JSON configuration file
//! ├── keys: KeyConfig             # Secret key material source
//! ├── s3: S3ProbeConfig           # Region and endpoint for the probe
//! ├── validator: ValidatorConfig  # Probe timeout
//! └── command: Command            # show | submit | status | keygen
//! ```
//!
//! All options can be provided via CLI arguments or environment variables.

mod keys;
mod submit;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
pub use keys::KeyConfig;
use serde::{Deserialize, Serialize};
pub use submit::SubmitArgs;
use sweep_core::codec::CipherCodec;
use sweep_job::{FileStore, JobController, JobReader};
use sweep_storage::{S3Probe, S3ProbeConfig, StorageValidator, ValidatorConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "sweep")]
#[command(about = "Configure the scheduled deletion job")]
#[command(version)]
pub struct Cli {
    /// Configuration store location.
    #[clap(flatten)]
    pub store: StoreConfig,

    /// Encryption key source.
    #[clap(flatten)]
    pub keys: KeyConfig,

    /// S3 probe connection settings.
    #[clap(flatten)]
    pub s3: S3ProbeConfig,

    /// Storage validation settings.
    #[clap(flatten)]
    pub validator: ValidatorConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Configuration store location.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON configuration file
    #[arg(long = "config-file", env = "SWEEP_CONFIG_FILE", default_value = "sweep.json")]
    pub config_file: PathBuf,
}

/// Available operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the configuration form as JSON, with the secret redacted.
    Show,
    /// Validate a configuration and save it if valid.
    Submit(SubmitArgs),
    /// Summarize the configuration the scheduler would run with.
    Status,
    /// Print a new random encryption key.
    Keygen,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so that command output on stdout stays parseable.
    pub fn init_tracing() -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn"))
            .map_err(|e| anyhow::anyhow!("Failed to create env filter: {e}"))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            config_file = %self.store.config_file.display(),
            key_source = %self.keys.describe(),
            s3_region = %self.s3.effective_region(),
            s3_endpoint = ?self.s3.endpoint.as_ref().map(|url| url.as_str()),
            probe_timeout_secs = self.validator.effective_timeout().as_secs(),
            "Configuration"
        );
    }

    /// Creates the controller for the configured store, key and backend.
    pub fn controller(&self) -> JobController {
        let validator =
            StorageValidator::new(S3Probe::new(self.s3.clone())).with_config(&self.validator);

        JobController::new(
            Arc::new(FileStore::new(&self.store.config_file)),
            Arc::new(self.codec()),
            validator,
        )
    }

    /// Creates the scheduler-side reader.
    pub fn reader(&self) -> JobReader {
        JobReader::new(
            Arc::new(FileStore::new(&self.store.config_file)),
            Arc::new(self.codec()),
        )
    }

    fn codec(&self) -> CipherCodec {
        CipherCodec::new(self.keys.key_source())
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "sweep",
            "--config-file",
            "/tmp/sweep.json",
            "submit",
            "--enabled",
            "true",
            "--frequency",
            "15",
            "--bucket-name",
            "archive",
        ])
        .unwrap();

        assert_eq!(cli.store.config_file, PathBuf::from("/tmp/sweep.json"));
        let Command::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.enabled, Some(true));
        assert_eq!(args.frequency_minutes.as_deref(), Some("15"));
        assert_eq!(args.bucket_name.as_deref(), Some("archive"));
        assert_eq!(args.access_key, None);
    }

    #[test]
    fn test_probe_defaults() {
        let cli = Cli::try_parse_from(["sweep", "status"]).unwrap();

        assert_eq!(cli.s3.effective_region(), "us-east-1");
        assert_eq!(cli.validator.effective_timeout().as_secs(), 10);
    }
}
