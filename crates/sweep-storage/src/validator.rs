//! Credential validation with a bounded probe.

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::probe::{ProbeRequest, StorageProbe};
use crate::{StorageValidationError, TRACING_TARGET, ValidationResult};

/// Default probe timeout: 10 seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 10;

/// Configuration for the storage validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ValidatorConfig {
    /// Storage probe timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "probe-timeout", env = "PROBE_TIMEOUT", default_value = "10")
    )]
    #[serde(default = "default_timeout_secs")]
    pub probe_timeout: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: default_timeout_secs(),
        }
    }
}

impl ValidatorConfig {
    /// Returns the effective timeout, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.probe_timeout == 0 {
            Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.probe_timeout)
        }
    }
}

/// Confirms that candidate credentials authorize access to a bucket.
///
/// Holds no state besides its probe; each call is one network round trip.
/// Failures are not retried.
#[derive(Clone)]
pub struct StorageValidator {
    probe: Arc<dyn StorageProbe>,
    timeout: Duration,
}

impl StorageValidator {
    /// Creates a validator with the default timeout.
    pub fn new(probe: impl StorageProbe + 'static) -> Self {
        Self::from_arc(Arc::new(probe))
    }

    /// Creates a validator from a shared probe.
    pub fn from_arc(probe: Arc<dyn StorageProbe>) -> Self {
        Self {
            probe,
            timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }

    /// Applies the timeout from `config`.
    #[must_use]
    pub fn with_config(self, config: &ValidatorConfig) -> Self {
        self.with_timeout(config.effective_timeout())
    }

    /// Sets the probe timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the probe timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probes `bucket` with the given credentials.
    ///
    /// A probe that exceeds the timeout is reported as
    /// [`StorageValidationError::NetworkError`].
    pub async fn validate(
        &self,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
    ) -> ValidationResult {
        let request = ProbeRequest::new(bucket, access_key, secret_key);
        let backend = self.probe.backend_name();

        tracing::debug!(
            target: TRACING_TARGET,
            backend,
            bucket = %bucket,
            "Probing storage credentials"
        );

        let result = match tokio::time::timeout(self.timeout, self.probe.probe(&request)).await {
            Ok(result) => result,
            Err(_) => Err(StorageValidationError::NetworkError(format!(
                "no response from storage backend within {}s",
                self.timeout.as_secs_f32()
            ))),
        };

        match &result {
            Ok(()) => tracing::info!(
                target: TRACING_TARGET,
                backend,
                bucket = %bucket,
                "Storage credentials accepted"
            ),
            Err(err) => tracing::warn!(
                target: TRACING_TARGET,
                backend,
                bucket = %bucket,
                kind = err.kind_str(),
                error = %err.message(),
                "Storage credentials rejected"
            ),
        }

        result
    }
}

impl std::fmt::Debug for StorageValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageValidator")
            .field("backend", &self.probe.backend_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
