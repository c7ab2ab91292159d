//! Secret codec error types.

use thiserror::Error;

/// Result type for secret codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors surfaced by a [`SecretCodec`](super::SecretCodec).
///
/// Messages describe the failure only; they never include key material,
/// plaintext or ciphertext.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Key material is missing, unreadable or malformed.
    #[error("encryption key unavailable: {0}")]
    EncryptionUnavailable(String),
    /// Ciphertext is malformed or was produced with a different key.
    #[error("stored secret could not be decrypted: {0}")]
    DecryptionFailed(String),
}

impl CodecError {
    /// Creates a new encryption unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::EncryptionUnavailable(msg.into())
    }

    /// Creates a new decryption failed error.
    pub fn decryption(msg: impl Into<String>) -> Self {
        Self::DecryptionFailed(msg.into())
    }
}
