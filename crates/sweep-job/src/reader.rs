//! Scheduler-side access to the job configuration.

use std::sync::Arc;
use std::time::Duration;

use sweep_core::codec::SecretCodec;
use sweep_core::{Error, Result};
use zeroize::Zeroizing;

use crate::TRACING_TARGET_CONTROLLER;
use crate::model::{Frequency, JobConfiguration};
use crate::store::ConfigStore;

/// The configuration as the scheduler runs it, secret included.
///
/// Only produced by [`JobReader`]; never handed to the presentation path.
#[derive(Clone)]
pub struct ScheduledJob {
    /// Whether the job runs.
    pub enabled: bool,
    /// Run frequency; `None` when unset.
    pub frequency: Option<Frequency>,
    /// Success notification addresses.
    pub success_recipients: Vec<String>,
    /// Failure notification addresses.
    pub failure_recipients: Vec<String>,
    /// Target bucket.
    pub bucket_name: String,
    /// Storage access key id.
    pub access_key: String,
    /// Decrypted secret key; `None` if no secret is stored.
    pub secret_key: Option<Zeroizing<String>>,
    /// Prefix for written object keys.
    pub object_key_prefix: String,
}

impl ScheduledJob {
    /// Returns the interval between runs, if the job should run at all.
    pub fn interval(&self) -> Option<Duration> {
        self.frequency
            .filter(|_| self.enabled)
            .map(Frequency::as_duration)
    }

    /// Returns `true` if the job is enabled with everything it needs.
    pub fn is_runnable(&self) -> bool {
        self.interval().is_some()
            && !self.bucket_name.is_empty()
            && !self.access_key.is_empty()
            && self.secret_key.is_some()
    }
}

impl std::fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("enabled", &self.enabled)
            .field("frequency", &self.frequency)
            .field("success_recipients", &self.success_recipients)
            .field("failure_recipients", &self.failure_recipients)
            .field("bucket_name", &self.bucket_name)
            .field("access_key", &self.access_key)
            .field("has_secret", &self.secret_key.is_some())
            .field("object_key_prefix", &self.object_key_prefix)
            .finish()
    }
}

/// Reads the current configuration for the scheduler.
#[derive(Clone)]
pub struct JobReader {
    store: Arc<dyn ConfigStore>,
    codec: Arc<dyn SecretCodec>,
}

impl JobReader {
    /// Creates a new reader.
    pub fn new(store: Arc<dyn ConfigStore>, codec: Arc<dyn SecretCodec>) -> Self {
        Self { store, codec }
    }

    /// Returns the current configuration with the secret decrypted.
    ///
    /// A stored secret that cannot be decrypted is an error of kind
    /// [`DecryptionFailed`](sweep_core::ErrorKind::DecryptionFailed).
    pub fn current(&self) -> Result<ScheduledJob> {
        let configuration = JobConfiguration::read_from(self.store.as_ref())?;

        let secret_key = match configuration.storage.secret_key.as_ref() {
            Some(ciphertext) => Some(self.codec.decrypt(ciphertext).map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_CONTROLLER,
                    error = %err,
                    "Stored secret key cannot be decrypted"
                );
                Error::from(err)
            })?),
            None => None,
        };

        Ok(ScheduledJob {
            enabled: configuration.enabled,
            frequency: configuration.frequency,
            success_recipients: configuration.success_recipients(),
            failure_recipients: configuration.failure_recipients(),
            bucket_name: configuration.storage.bucket_name,
            access_key: configuration.storage.access_key,
            secret_key,
            object_key_prefix: configuration.storage.object_key_prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use sweep_core::ErrorKind;
    use sweep_test::test_codec;

    use super::*;
    use crate::model::StorageCredential;
    use crate::store::MemoryStore;

    fn stored(codec: &dyn SecretCodec) -> Arc<MemoryStore> {
        let configuration = JobConfiguration {
            enabled: true,
            frequency: Frequency::from_seconds(600),
            email_on_success: "ops@example.com".into(),
            email_on_failure: String::new(),
            storage: StorageCredential {
                bucket_name: "archive".into(),
                access_key: "AKIAEXAMPLE".into(),
                secret_key: Some(codec.encrypt("s3cr3t-value").unwrap()),
                object_key_prefix: String::new(),
            },
        };
        let store = Arc::new(MemoryStore::new());
        store.save(configuration.changeset()).unwrap();
        store
    }

    #[test]
    fn test_current_decrypts_secret() {
        let codec = Arc::new(test_codec());
        let reader = JobReader::new(stored(codec.as_ref()), codec);

        let job = reader.current().unwrap();
        assert_eq!(job.secret_key.as_deref().map(String::as_str), Some("s3cr3t-value"));
        assert_eq!(job.interval(), Some(Duration::from_secs(600)));
        assert_eq!(job.success_recipients, vec!["ops@example.com".to_owned()]);
        assert!(job.is_runnable());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let codec = Arc::new(test_codec());
        let job = JobReader::new(stored(codec.as_ref()), codec).current().unwrap();

        let debug = format!("{job:?}");
        assert!(!debug.contains("s3cr3t-value"));
        assert!(debug.contains("has_secret: true"));
    }

    #[test]
    fn test_rotated_key_is_error() {
        let store = stored(&test_codec());
        let reader = JobReader::new(store, Arc::new(test_codec()));

        let err = reader.current().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
    }

    #[test]
    fn test_disabled_job_has_no_interval() {
        let reader = JobReader::new(Arc::new(MemoryStore::new()), Arc::new(test_codec()));

        let job = reader.current().unwrap();
        assert_eq!(job.interval(), None);
        assert!(!job.is_runnable());
        assert!(job.secret_key.is_none());
    }
}
