//! Parsed operator submission.

use sweep_core::codec::{CodecResult, SecretCodec};
use zeroize::Zeroizing;

use super::{Frequency, JobConfiguration, StorageCredential};
use crate::field::JobField;
use crate::validation::ValidationErrors;

/// What the operator did with the secret field.
#[derive(Clone)]
pub enum SecretInput {
    /// Sentinel or blank: keep the stored ciphertext unchanged.
    Keep,
    /// A new plaintext secret to validate and encrypt.
    Replace(Zeroizing<String>),
}

impl SecretInput {
    /// Returns `true` if a new secret was submitted.
    pub fn is_replacement(&self) -> bool {
        matches!(self, Self::Replace(_))
    }
}

impl std::fmt::Debug for SecretInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keep => f.write_str("Keep"),
            Self::Replace(_) => f.write_str("Replace(..)"),
        }
    }
}

/// A submitted form after trimming and unit conversion.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Whether the job should run.
    pub enabled: bool,
    /// Run frequency; `None` when unset.
    pub frequency: Option<Frequency>,
    /// Comma-separated addresses notified on success.
    pub email_on_success: String,
    /// Comma-separated addresses notified on failure.
    pub email_on_failure: String,
    /// Target bucket.
    pub bucket_name: String,
    /// Storage access key id.
    pub access_key: String,
    /// Secret field outcome.
    pub secret_key: SecretInput,
    /// Prefix for written object keys.
    pub object_key_prefix: String,
}

impl Submission {
    /// Returns the required fields that are empty, given the stored record.
    ///
    /// A kept secret only counts as present if a ciphertext is stored.
    pub fn missing_required(&self, existing: &JobConfiguration) -> Vec<JobField> {
        JobField::REQUIRED_WHEN_ENABLED
            .into_iter()
            .filter(|field| match field {
                JobField::Frequency => self.frequency.is_none(),
                JobField::BucketName => self.bucket_name.is_empty(),
                JobField::AccessKey => self.access_key.is_empty(),
                JobField::SecretKey => {
                    !self.secret_key.is_replacement() && !existing.storage.has_secret()
                }
                _ => false,
            })
            .collect()
    }

    /// Resolves the plaintext secret the submission would run with.
    ///
    /// Decrypts the stored ciphertext when the secret is kept; returns
    /// `Ok(None)` if nothing is stored.
    pub fn effective_secret(
        &self,
        existing: &JobConfiguration,
        codec: &dyn SecretCodec,
    ) -> CodecResult<Option<Zeroizing<String>>> {
        match &self.secret_key {
            SecretInput::Replace(secret) => Ok(Some(secret.clone())),
            SecretInput::Keep => existing
                .storage
                .secret_key
                .as_ref()
                .map(|ciphertext| codec.decrypt(ciphertext))
                .transpose(),
        }
    }

    /// Builds the record to persist.
    ///
    /// A kept secret carries the stored ciphertext over byte for byte; a
    /// replacement is encrypted through `codec`.
    pub fn into_configuration(
        self,
        existing: &JobConfiguration,
        codec: &dyn SecretCodec,
    ) -> Result<JobConfiguration, ValidationErrors> {
        let secret_key = match self.secret_key {
            SecretInput::Keep => existing.storage.secret_key.clone(),
            SecretInput::Replace(secret) => match codec.encrypt(&secret) {
                Ok(ciphertext) => Some(ciphertext),
                Err(err) => {
                    let mut errors = ValidationErrors::new();
                    errors.add(JobField::SecretKey, err);
                    return Err(errors);
                }
            },
        };

        Ok(JobConfiguration {
            enabled: self.enabled,
            frequency: self.frequency,
            email_on_success: self.email_on_success,
            email_on_failure: self.email_on_failure,
            storage: StorageCredential {
                bucket_name: self.bucket_name,
                access_key: self.access_key,
                secret_key,
                object_key_prefix: self.object_key_prefix,
            },
        })
    }
}
