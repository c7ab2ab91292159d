//! Field-level validation results.

use sweep_core::codec::CodecError;
use sweep_storage::StorageValidationError;

use crate::field::JobField;

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldErrorKind {
    /// A required field is empty while the job is being enabled.
    #[error("is required when the job is enabled")]
    ConfigurationIncomplete,

    /// The frequency is not a whole number of minutes.
    #[error("must be a whole number of minutes: {0}")]
    InvalidFrequency(String),

    /// The storage backend rejected the credentials.
    #[error("failed connecting to storage backend: {0}")]
    StorageValidation(#[from] StorageValidationError),

    /// The new secret could not be encrypted.
    #[error("cannot be stored: {0}")]
    EncryptionUnavailable(String),

    /// The stored secret could not be decrypted.
    #[error("stored value cannot be read: {0}")]
    DecryptionFailed(String),
}

impl From<CodecError> for FieldErrorKind {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::EncryptionUnavailable(msg) => Self::EncryptionUnavailable(msg),
            CodecError::DecryptionFailed(msg) => Self::DecryptionFailed(msg),
        }
    }
}

/// An error attached to one field of the submitted form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} {kind}")]
pub struct FieldError {
    /// The offending field.
    pub field: JobField,
    /// What is wrong with it.
    pub kind: FieldErrorKind,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(field: JobField, kind: impl Into<FieldErrorKind>) -> Self {
        Self {
            field,
            kind: kind.into(),
        }
    }
}

/// Every field error found in one submission.
///
/// A non-empty set blocks persistence of the whole submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error against `field`.
    pub fn add(&mut self, field: JobField, kind: impl Into<FieldErrorKind>) {
        self.errors.push(FieldError::new(field, kind));
    }

    /// Returns `true` if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates over all errors in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Iterates over the errors attached to `field`.
    pub fn for_field(&self, field: JobField) -> impl Iterator<Item = &FieldErrorKind> {
        self.errors
            .iter()
            .filter(move |error| error.field == field)
            .map(|error| &error.kind)
    }

    /// Returns `true` if any error is attached to `field`.
    pub fn contains(&self, field: JobField) -> bool {
        self.for_field(field).next().is_some()
    }

    /// Returns the distinct fields with errors, in recorded order.
    pub fn fields(&self) -> Vec<JobField> {
        let mut fields: Vec<JobField> = Vec::with_capacity(self.errors.len());
        for error in &self.errors {
            if !fields.contains(&error.field) {
                fields.push(error.field);
            }
        }
        fields
    }

    /// Returns `Ok(value)` if empty, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type IntoIter = std::vec::IntoIter<FieldError>;
    type Item = FieldError;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
