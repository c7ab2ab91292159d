//! Cryptographic error types.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The ciphertext is too short to contain a valid nonce and tag.
    #[error("ciphertext too short to contain nonce and authentication tag")]
    CiphertextTooShort,
    /// Decryption failed - data may be corrupted or tampered with.
    #[error("decryption failed: data may be corrupted or tampered with")]
    DecryptionFailed,
    /// Encryption failed inside the cipher.
    #[error("encryption failed")]
    EncryptionFailed,
    /// Key material was empty.
    #[error("key material is empty")]
    EmptyKeyMaterial,
    /// Key material was not valid base64.
    #[error("key material is not valid base64: {0}")]
    InvalidKeyEncoding(String),
}
