//! 256-bit encryption keys.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::XChaCha20Poly1305;
use chacha20poly1305::aead::{KeyInit, OsRng};
use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::error::{CryptoError, CryptoResult};

/// Size of an encryption key in bytes.
pub const KEY_SIZE: usize = 32;

/// Domain separation for passphrase-derived keys.
const KDF_SALT: &[u8] = b"sweep-job/secret-codec";
const KDF_INFO: &[u8] = b"storage-secret-key";

/// A 256-bit symmetric key, wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    /// Generates a new random key from the OS random source.
    pub fn generate() -> Self {
        let generated = XChaCha20Poly1305::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&generated);
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Derives a key from arbitrary non-empty material with HKDF-SHA256.
    pub fn derive(material: &[u8]) -> CryptoResult<Self> {
        if material.is_empty() {
            return Err(CryptoError::EmptyKeyMaterial);
        }

        let hkdf = Hkdf::<Sha256>::new(Some(KDF_SALT), material);
        let mut bytes = [0u8; KEY_SIZE];
        // 32 bytes is always a valid HKDF-SHA256 output length.
        hkdf.expand(KDF_INFO, &mut bytes)
            .map_err(|_| CryptoError::EmptyKeyMaterial)?;

        Ok(Self { bytes })
    }

    /// Parses base64 key text.
    ///
    /// Exactly 32 decoded bytes are used as-is; any other non-empty value is
    /// treated as a passphrase and stretched with [`EncryptionKey::derive`].
    pub fn from_base64(text: &str) -> CryptoResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CryptoError::EmptyKeyMaterial);
        }

        let mut decoded = STANDARD
            .decode(text)
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;

        let key = match <[u8; KEY_SIZE]>::try_from(decoded.as_slice()) {
            Ok(bytes) => Ok(Self::from_bytes(bytes)),
            Err(_) => Self::derive(&decoded),
        };
        decoded.zeroize();
        key
    }

    /// Renders the key as base64 text, the format accepted by [`EncryptionKey::from_base64`].
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.bytes)
    }

    /// Returns the raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_random() {
        assert_ne!(EncryptionKey::generate(), EncryptionKey::generate());
    }

    #[test]
    fn test_base64_roundtrip() {
        let key = EncryptionKey::generate();
        let parsed = EncryptionKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn test_short_material_is_derived() {
        let text = STANDARD.encode(b"correct horse battery staple");
        let first = EncryptionKey::from_base64(&text).unwrap();
        let second = EncryptionKey::from_base64(&text).unwrap();

        assert_eq!(first, second);
        assert_ne!(&first.as_bytes()[..], &b"correct horse battery staple"[..]);
    }

    #[test]
    fn test_empty_material_rejected() {
        assert_eq!(
            EncryptionKey::from_base64("  \n"),
            Err(CryptoError::EmptyKeyMaterial)
        );
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let result = EncryptionKey::from_base64("not base64!!");
        assert!(matches!(result, Err(CryptoError::InvalidKeyEncoding(_))));
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = EncryptionKey::from_bytes([7u8; KEY_SIZE]);
        assert_eq!(format!("{key:?}"), "EncryptionKey { .. }");
    }
}
