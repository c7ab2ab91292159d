//! Operator-facing form state.

use serde::{Deserialize, Serialize};
use sweep_core::codec::{CodecError, is_redaction_sentinel};
use zeroize::Zeroizing;

use super::{Frequency, SecretInput, Submission};
use crate::field::JobField;
use crate::validation::{FieldErrorKind, ValidationErrors};

/// The configuration as the operator sees and edits it.
///
/// All values are text as typed; the frequency is in minutes. The secret
/// field never carries a stored secret, only the redaction sentinel or a
/// new value typed by the operator.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayForm {
    /// Whether the job is enabled.
    pub enabled: bool,
    /// Run frequency in minutes; empty when unset.
    pub frequency_minutes: String,
    /// Comma-separated addresses notified on success.
    pub email_on_success: String,
    /// Comma-separated addresses notified on failure.
    pub email_on_failure: String,
    /// Target bucket.
    pub bucket_name: String,
    /// Storage access key id.
    pub access_key: String,
    /// Storage secret key, or the redaction sentinel.
    pub secret_key: String,
    /// Prefix for written object keys.
    pub object_key_prefix: String,
}

impl DisplayForm {
    /// Normalizes the submitted text into a [`Submission`].
    ///
    /// Only format problems are reported here; required-field rules depend
    /// on the stored record and are checked by the controller.
    pub fn parse(&self) -> Result<Submission, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let frequency = Frequency::parse_minutes(&self.frequency_minutes).unwrap_or_else(|reason| {
            errors.add(JobField::Frequency, FieldErrorKind::InvalidFrequency(reason));
            None
        });

        let secret = self.secret_key.trim();
        let secret_key = if secret.is_empty() || is_redaction_sentinel(secret) {
            SecretInput::Keep
        } else {
            SecretInput::Replace(Zeroizing::new(secret.to_owned()))
        };

        errors.into_result(Submission {
            enabled: self.enabled,
            frequency,
            email_on_success: self.email_on_success.trim().to_owned(),
            email_on_failure: self.email_on_failure.trim().to_owned(),
            bucket_name: self.bucket_name.trim().to_owned(),
            access_key: self.access_key.trim().to_owned(),
            secret_key,
            object_key_prefix: self.object_key_prefix.trim().to_owned(),
        })
    }
}

impl std::fmt::Debug for DisplayForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayForm")
            .field("enabled", &self.enabled)
            .field("frequency_minutes", &self.frequency_minutes)
            .field("email_on_success", &self.email_on_success)
            .field("email_on_failure", &self.email_on_failure)
            .field("bucket_name", &self.bucket_name)
            .field("access_key", &self.access_key)
            .field("object_key_prefix", &self.object_key_prefix)
            .finish_non_exhaustive()
    }
}

/// A non-fatal problem found while preparing the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum LoadWarning {
    /// Key material is unreadable; a new secret cannot be saved.
    #[error("cannot read encryption key: {0}")]
    EncryptionUnavailable(String),
    /// The stored secret cannot be decrypted; no preview is shown.
    #[error("cannot read stored secret key: {0}")]
    DecryptionFailed(String),
}

impl From<CodecError> for LoadWarning {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::EncryptionUnavailable(msg) => Self::EncryptionUnavailable(msg),
            CodecError::DecryptionFailed(msg) => Self::DecryptionFailed(msg),
        }
    }
}

/// The form ready for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadedForm {
    /// Prefilled form values.
    pub form: DisplayForm,
    /// Help text for the secret field, e.g. `Stored key: AB******GH`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_key_hint: Option<String>,
    /// Non-fatal problems to show to the operator.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<LoadWarning>,
}
