//! [`SecretCodec`] backed by XChaCha20-Poly1305.

use std::path::PathBuf;

use zeroize::Zeroizing;

use super::{Ciphertext, CodecError, CodecResult, SecretCodec};
use crate::TRACING_TARGET_CODEC;
use crate::crypto::{self, EncryptionKey};

/// Where a [`CipherCodec`] reads its key material from.
///
/// File and environment sources are re-read on every operation, so a key
/// that goes missing or is rotated is noticed at the next use.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// A key held in memory.
    Static(EncryptionKey),
    /// A file containing base64 key text.
    File(PathBuf),
    /// An environment variable containing base64 key text.
    Env(String),
}

impl KeySource {
    fn load(&self) -> CodecResult<EncryptionKey> {
        let text = match self {
            Self::Static(key) => return Ok(key.clone()),
            Self::File(path) => std::fs::read_to_string(path).map(Zeroizing::new).map_err(|e| {
                CodecError::unavailable(format!("cannot read key file {}: {e}", path.display()))
            })?,
            Self::Env(name) => std::env::var(name).map(Zeroizing::new).map_err(|e| {
                CodecError::unavailable(format!("cannot read key variable {name}: {e}"))
            })?,
        };

        EncryptionKey::from_base64(&text).map_err(|e| CodecError::unavailable(e.to_string()))
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::Static(_) => "static",
            Self::File(_) => "file",
            Self::Env(_) => "env",
        }
    }
}

/// Secret codec encrypting with a key from a [`KeySource`].
#[derive(Debug, Clone)]
pub struct CipherCodec {
    source: KeySource,
}

impl CipherCodec {
    /// Creates a codec reading key material from `source`.
    pub fn new(source: KeySource) -> Self {
        Self { source }
    }

    /// Returns the key source.
    pub fn source(&self) -> &KeySource {
        &self.source
    }

    fn key(&self) -> CodecResult<EncryptionKey> {
        self.source.load().inspect_err(|err| {
            tracing::warn!(
                target: TRACING_TARGET_CODEC,
                source = self.source.describe(),
                error = %err,
                "Encryption key unavailable"
            );
        })
    }
}

impl SecretCodec for CipherCodec {
    fn encrypt(&self, plaintext: &str) -> CodecResult<Ciphertext> {
        let key = self.key()?;
        let bytes = crypto::encrypt(&key, plaintext.as_bytes())
            .map_err(|e| CodecError::unavailable(e.to_string()))?;

        tracing::debug!(target: TRACING_TARGET_CODEC, "Secret encrypted");
        Ok(Ciphertext::new(bytes))
    }

    fn decrypt(&self, ciphertext: &Ciphertext) -> CodecResult<Zeroizing<String>> {
        let key = self
            .key()
            .map_err(|e| CodecError::decryption(e.to_string()))?;

        let bytes = crypto::decrypt(&key, ciphertext.as_ref())
            .map(Zeroizing::new)
            .map_err(|e| CodecError::decryption(e.to_string()))?;

        let plaintext = std::str::from_utf8(&bytes)
            .map_err(|_| CodecError::decryption("decrypted secret is not valid UTF-8"))?;

        tracing::debug!(target: TRACING_TARGET_CODEC, "Secret decrypted");
        Ok(Zeroizing::new(plaintext.to_owned()))
    }

    fn check_key(&self) -> CodecResult<()> {
        self.key().map(|_| ())
    }
}
