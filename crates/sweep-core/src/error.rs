//! Common error type definitions.

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
///
/// Used as the source error in [`Error`], wrapping any error that implements
/// the standard `Error` trait while keeping `Send` and `Sync` bounds.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of infrastructure errors.
///
/// Operator-facing validation problems are not represented here; they are
/// collected per field by the job controller instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Reading or writing the configuration store failed.
    Persistence,
    /// A persisted value could not be (de)serialized.
    Serialization,
    /// Key material for the secret codec is missing or unreadable.
    EncryptionUnavailable,
    /// A stored secret could not be decrypted.
    DecryptionFailed,
}

/// A structured error type for sweep operations.
#[derive(Debug, Error)]
#[error("{kind:?}{}", message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Creates a new persistence error.
    pub fn persistence() -> Self {
        Self::new(ErrorKind::Persistence)
    }

    /// Creates a new serialization error.
    pub fn serialization() -> Self {
        Self::new(ErrorKind::Serialization)
    }

    /// Creates a new encryption unavailable error.
    pub fn encryption_unavailable() -> Self {
        Self::new(ErrorKind::EncryptionUnavailable)
    }

    /// Creates a new decryption failed error.
    pub fn decryption_failed() -> Self {
        Self::new(ErrorKind::DecryptionFailed)
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the error kind as a string.
    pub fn kind_str(&self) -> &'static str {
        self.kind.into()
    }
}

impl From<crate::codec::CodecError> for Error {
    fn from(err: crate::codec::CodecError) -> Self {
        use crate::codec::CodecError;

        let error = match err {
            CodecError::EncryptionUnavailable(_) => Self::encryption_unavailable(),
            CodecError::DecryptionFailed(_) => Self::decryption_failed(),
        };
        error.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    #[test]
    fn test_display_includes_message() {
        let err = Error::persistence().with_message("disk full");
        assert_eq!(err.to_string(), "Persistence: disk full");
        assert_eq!(err.kind_str(), "persistence");
    }

    #[test]
    fn test_display_without_message() {
        let err = Error::serialization();
        assert_eq!(err.to_string(), "Serialization");
    }

    #[test]
    fn test_from_codec_error() {
        let err: Error = CodecError::DecryptionFailed("bad tag".into()).into();
        assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = CodecError::unavailable("no key").into();
        assert_eq!(err.kind_str(), "encryption_unavailable");
    }
}
