//! The persisted job configuration record.

use serde_json::Value;
use sweep_core::codec::{Ciphertext, REDACTION_SENTINEL, SecretCodec, masked_preview};
use sweep_core::{Error, Result};

use super::{DisplayForm, Frequency, LoadWarning, LoadedForm};
use crate::field::JobField;
use crate::store::{Changeset, ConfigStore};
use crate::validation::ValidationErrors;

/// Credentials and location of the archive bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageCredential {
    /// Target bucket.
    pub bucket_name: String,
    /// Storage access key id.
    pub access_key: String,
    /// Encrypted secret key; `None` until a secret has been saved.
    pub secret_key: Option<Ciphertext>,
    /// Prefix for written object keys.
    pub object_key_prefix: String,
}

impl StorageCredential {
    /// Returns `true` if an encrypted secret is stored.
    pub fn has_secret(&self) -> bool {
        self.secret_key.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// The deletion job configuration.
///
/// A singleton record: created by the first save, overwritten by every
/// later one, never deleted. Disabling the job is `enabled = false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobConfiguration {
    /// Whether the job runs.
    pub enabled: bool,
    /// Run frequency; `None` when unset.
    pub frequency: Option<Frequency>,
    /// Comma-separated addresses notified on success.
    pub email_on_success: String,
    /// Comma-separated addresses notified on failure.
    pub email_on_failure: String,
    /// Archive bucket credentials.
    pub storage: StorageCredential,
}

impl JobConfiguration {
    /// Reads the record from `store`; missing values take their defaults.
    pub fn read_from(store: &dyn ConfigStore) -> Result<Self> {
        let enabled = read_flag(store, JobField::Enabled)?;
        let frequency = read_frequency(store)?;
        let secret_key = match read_text(store, JobField::SecretKey)? {
            text if text.is_empty() => None,
            text => Some(Ciphertext::from_base64(&text).map_err(|err| {
                Error::serialization()
                    .with_message(format!("{} holds an invalid value", JobField::SecretKey.key_path()))
                    .with_source(err)
            })?),
        };

        Ok(Self {
            enabled,
            frequency,
            email_on_success: read_text(store, JobField::EmailOnSuccess)?,
            email_on_failure: read_text(store, JobField::EmailOnFailure)?,
            storage: StorageCredential {
                bucket_name: read_text(store, JobField::BucketName)?,
                access_key: read_text(store, JobField::AccessKey)?,
                secret_key,
                object_key_prefix: read_text(store, JobField::ObjectKeyPrefix)?,
            },
        })
    }

    /// Returns the writes that persist the full record.
    ///
    /// An unset frequency is written as an empty string.
    pub fn changeset(&self) -> Changeset {
        let frequency = match self.frequency {
            Some(frequency) => Value::from(frequency.seconds()),
            None => Value::from(""),
        };
        let secret_key = match &self.storage.secret_key {
            Some(ciphertext) => Value::from(ciphertext.to_base64()),
            None => Value::Null,
        };

        Changeset::new()
            .set(JobField::Enabled.key_path(), self.enabled)
            .set(JobField::Frequency.key_path(), frequency)
            .set(JobField::EmailOnSuccess.key_path(), self.email_on_success.as_str())
            .set(JobField::EmailOnFailure.key_path(), self.email_on_failure.as_str())
            .set(JobField::BucketName.key_path(), self.storage.bucket_name.as_str())
            .set(JobField::AccessKey.key_path(), self.storage.access_key.as_str())
            .set(JobField::SecretKey.key_path(), secret_key)
            .set(
                JobField::ObjectKeyPrefix.key_path(),
                self.storage.object_key_prefix.as_str(),
            )
    }

    /// Prepares the record for display.
    ///
    /// A stored secret becomes the redaction sentinel. If it can be
    /// decrypted, a masked preview is added as help text; otherwise the
    /// sentinel is shown alone and a warning is returned.
    pub fn to_display(&self, codec: &dyn SecretCodec) -> LoadedForm {
        let mut warnings = Vec::new();
        let mut secret_key_hint = None;
        let mut secret_key = String::new();

        if let Some(ciphertext) = self.storage.secret_key.as_ref() {
            secret_key = REDACTION_SENTINEL.to_owned();
            match codec.decrypt(ciphertext) {
                Ok(plaintext) => {
                    secret_key_hint = Some(format!("Stored key: {}", masked_preview(&plaintext)));
                }
                Err(err) => warnings.push(LoadWarning::from(err)),
            }
        }

        LoadedForm {
            form: DisplayForm {
                enabled: self.enabled,
                frequency_minutes: Frequency::display_minutes(self.frequency),
                email_on_success: self.email_on_success.clone(),
                email_on_failure: self.email_on_failure.clone(),
                bucket_name: self.storage.bucket_name.clone(),
                access_key: self.storage.access_key.clone(),
                secret_key,
                object_key_prefix: self.storage.object_key_prefix.clone(),
            },
            secret_key_hint,
            warnings,
        }
    }

    /// Builds the next record from a submitted form.
    ///
    /// Minutes become seconds, and the secret is resolved against
    /// `existing`: sentinel or blank keeps the stored ciphertext, anything
    /// else is encrypted as the new secret. Required-field rules and backend
    /// validation are not applied here.
    pub fn from_submission(
        input: &DisplayForm,
        existing: &JobConfiguration,
        codec: &dyn SecretCodec,
    ) -> std::result::Result<Self, ValidationErrors> {
        input.parse()?.into_configuration(existing, codec)
    }

    /// Returns the success notification addresses.
    pub fn success_recipients(&self) -> Vec<String> {
        split_recipients(&self.email_on_success)
    }

    /// Returns the failure notification addresses.
    pub fn failure_recipients(&self) -> Vec<String> {
        split_recipients(&self.email_on_failure)
    }
}

fn split_recipients(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_owned)
        .collect()
}

fn invalid_value(field: JobField, value: &Value) -> Error {
    Error::serialization().with_message(format!(
        "{} holds an unexpected value: {value}",
        field.key_path()
    ))
}

fn read_text(store: &dyn ConfigStore, field: JobField) -> Result<String> {
    match store.get(&field.key_path())? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(other) => Err(invalid_value(field, &other)),
    }
}

fn read_flag(store: &dyn ConfigStore, field: JobField) -> Result<bool> {
    match store.get(&field.key_path())? {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(flag)) => Ok(flag),
        Some(Value::Number(number)) => Ok(number.as_u64().is_some_and(|n| n != 0)),
        Some(Value::String(text)) => match text.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(invalid_value(field, &Value::String(text.clone()))),
        },
        Some(other) => Err(invalid_value(field, &other)),
    }
}

/// Empty string, zero, null and a missing key all read as unset.
fn read_frequency(store: &dyn ConfigStore) -> Result<Option<Frequency>> {
    let field = JobField::Frequency;
    match store.get(&field.key_path())? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_u64()
            .map(Frequency::from_seconds)
            .ok_or_else(|| invalid_value(field, &Value::Number(number))),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => text
            .trim()
            .parse::<u64>()
            .map(Frequency::from_seconds)
            .map_err(|_| invalid_value(field, &Value::String(text.clone()))),
        Some(other) => Err(invalid_value(field, &other)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use sweep_core::ErrorKind;
    use sweep_core::codec::{CipherCodec, KeySource};
    use sweep_core::crypto::EncryptionKey;

    use super::*;
    use crate::field::NAMESPACE;
    use crate::store::MemoryStore;
    use crate::validation::FieldErrorKind;

    fn codec() -> CipherCodec {
        CipherCodec::new(KeySource::Static(EncryptionKey::generate()))
    }

    fn configured(codec: &CipherCodec) -> JobConfiguration {
        JobConfiguration {
            enabled: true,
            frequency: Frequency::from_seconds(300),
            email_on_success: "ops@example.com, audit@example.com".into(),
            email_on_failure: "oncall@example.com".into(),
            storage: StorageCredential {
                bucket_name: "archive".into(),
                access_key: "AKIAEXAMPLE".into(),
                secret_key: Some(codec.encrypt("ABCDEFGH").unwrap()),
                object_key_prefix: "deletions/".into(),
            },
        }
    }

    #[test]
    fn test_defaults_when_store_empty() {
        let store = MemoryStore::new();
        let config = JobConfiguration::read_from(&store).unwrap();

        assert_eq!(config, JobConfiguration::default());
        assert!(!config.enabled);
        assert!(!config.storage.has_secret());
    }

    #[test]
    fn test_store_roundtrip() {
        let codec = codec();
        let config = configured(&codec);
        let store = MemoryStore::new();

        store.save(config.changeset()).unwrap();
        let loaded = JobConfiguration::read_from(&store).unwrap();

        assert_eq!(loaded, config);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot[NAMESPACE]["frequency_seconds"], json!(300));
    }

    #[test]
    fn test_unset_frequency_stored_as_empty_string() {
        let store = MemoryStore::new();
        store.save(JobConfiguration::default().changeset()).unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot[NAMESPACE]["frequency_seconds"], json!(""));
        assert_eq!(JobConfiguration::read_from(&store).unwrap().frequency, None);
    }

    #[test]
    fn test_legacy_values_read_tolerantly() {
        let store = MemoryStore::with_root(json!({
            NAMESPACE: {
                "enabled": "1",
                "frequency_seconds": "0",
                "storage": { "bucket_name": "archive" }
            }
        }));
        let config = JobConfiguration::read_from(&store).unwrap();

        assert!(config.enabled);
        assert_eq!(config.frequency, None);
        assert_eq!(config.storage.bucket_name, "archive");
        assert_eq!(config.storage.access_key, "");
    }

    #[test]
    fn test_sub_minute_frequency_stays_set() {
        let store = MemoryStore::with_root(json!({
            NAMESPACE: { "frequency_seconds": 30 }
        }));
        let config = JobConfiguration::read_from(&store).unwrap();
        let loaded = config.to_display(&codec());
        assert_eq!(loaded.form.frequency_minutes, "1");

        let next = JobConfiguration::from_submission(&loaded.form, &config, &codec()).unwrap();
        assert_eq!(next.frequency.map(Frequency::seconds), Some(60));
    }

    #[test]
    fn test_corrupt_secret_is_serialization_error() {
        let store = MemoryStore::with_root(json!({
            NAMESPACE: { "storage": { "secret_key": "%%% not base64" } }
        }));
        let err = JobConfiguration::read_from(&store).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_to_display_masks_secret() {
        let codec = codec();
        let loaded = configured(&codec).to_display(&codec);

        assert_eq!(loaded.form.secret_key, REDACTION_SENTINEL);
        assert_eq!(loaded.form.frequency_minutes, "5");
        assert_eq!(loaded.secret_key_hint.as_deref(), Some("Stored key: AB******GH"));
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn test_to_display_unset_frequency_is_empty() {
        let loaded = JobConfiguration::default().to_display(&codec());

        assert_eq!(loaded.form.frequency_minutes, "");
        assert_eq!(loaded.form.secret_key, "");
        assert_eq!(loaded.secret_key_hint, None);
    }

    #[test]
    fn test_to_display_undecryptable_secret_degrades() {
        let config = configured(&codec());
        let loaded = config.to_display(&codec());

        assert_eq!(loaded.form.secret_key, REDACTION_SENTINEL);
        assert_eq!(loaded.secret_key_hint, None);
        assert!(matches!(
            loaded.warnings.as_slice(),
            [LoadWarning::DecryptionFailed(_)]
        ));
    }

    #[test]
    fn test_from_submission_keeps_ciphertext_on_sentinel() {
        let codec = codec();
        let existing = configured(&codec);
        let form = existing.to_display(&codec).form;

        let next = JobConfiguration::from_submission(&form, &existing, &codec).unwrap();

        assert_eq!(next.storage.secret_key, existing.storage.secret_key);
        assert_eq!(next, existing);
    }

    #[test]
    fn test_from_submission_encrypts_new_secret() {
        let codec = codec();
        let existing = configured(&codec);
        let mut form = existing.to_display(&codec).form;
        form.secret_key = "new-secret".into();

        let next = JobConfiguration::from_submission(&form, &existing, &codec).unwrap();
        let ciphertext = next.storage.secret_key.as_ref().unwrap();

        assert_ne!(next.storage.secret_key, existing.storage.secret_key);
        assert_eq!(codec.decrypt(ciphertext).unwrap().as_str(), "new-secret");
    }

    #[test]
    fn test_from_submission_converts_minutes() {
        let form = DisplayForm {
            frequency_minutes: "0".into(),
            ..Default::default()
        };
        let next =
            JobConfiguration::from_submission(&form, &JobConfiguration::default(), &codec())
                .unwrap();
        assert_eq!(next.frequency, None);

        let form = DisplayForm {
            frequency_minutes: "5".into(),
            ..Default::default()
        };
        let next =
            JobConfiguration::from_submission(&form, &JobConfiguration::default(), &codec())
                .unwrap();
        assert_eq!(next.frequency.map(Frequency::seconds), Some(300));
    }

    #[test]
    fn test_from_submission_without_key_material() {
        let dir = tempfile::TempDir::new().unwrap();
        let codec = CipherCodec::new(KeySource::File(dir.path().join("absent.key")));
        let form = DisplayForm {
            secret_key: "new-secret".into(),
            ..Default::default()
        };

        let errors =
            JobConfiguration::from_submission(&form, &JobConfiguration::default(), &codec)
                .unwrap_err();
        assert!(matches!(
            errors.for_field(JobField::SecretKey).next(),
            Some(FieldErrorKind::EncryptionUnavailable(_))
        ));
    }

    #[test]
    fn test_recipients() {
        let config = configured(&codec());
        assert_eq!(
            config.success_recipients(),
            vec!["ops@example.com".to_owned(), "audit@example.com".to_owned()]
        );

        let empty = JobConfiguration {
            email_on_failure: " , ,".into(),
            ..Default::default()
        };
        assert!(empty.failure_recipients().is_empty());
    }
}
