//! Secret codec: the encrypt / redact / decrypt lifecycle of a stored secret.
//!
//! A secret entered by the operator is only ever persisted as a
//! [`Ciphertext`] produced by [`SecretCodec::encrypt`]. When the configuration
//! is shown again, the secret field is prefilled with [`REDACTION_SENTINEL`]
//! and at most a [`masked_preview`] of the decrypted value is rendered as help
//! text.

mod cipher_codec;
mod error;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
pub use cipher_codec::{CipherCodec, KeySource};
pub use error::{CodecError, CodecResult};
use zeroize::Zeroizing;

/// Placeholder shown in place of a stored secret.
pub const REDACTION_SENTINEL: &str = "*********";

/// Filler placed between the visible characters of a masked preview.
pub const MASK_FILLER: &str = "******";

/// Number of characters revealed at each end of a masked preview.
const PREVIEW_EDGE: usize = 2;

/// Encrypted-at-rest representation of a secret.
///
/// Opaque to everything but the codec that produced it.
#[derive(Clone, PartialEq, Eq)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Decodes a ciphertext previously rendered with [`Ciphertext::to_base64`].
    pub fn from_base64(text: &str) -> CodecResult<Self> {
        STANDARD
            .decode(text.trim())
            .map(Self)
            .map_err(|e| CodecError::decryption(format!("stored value is not base64: {e}")))
    }

    /// Renders the ciphertext for a text-based configuration store.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Returns the number of ciphertext bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the ciphertext holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Ciphertext {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ciphertext")
            .field("len", &self.0.len())
            .finish_non_exhaustive()
    }
}

/// Symmetric encryption capability supplied by the host environment.
///
/// Implementations must not log plaintext or ciphertext.
pub trait SecretCodec: Send + Sync {
    /// Encrypts a plaintext secret.
    ///
    /// Fails with [`CodecError::EncryptionUnavailable`] when key material
    /// cannot be read.
    fn encrypt(&self, plaintext: &str) -> CodecResult<Ciphertext>;

    /// Decrypts a ciphertext produced by [`SecretCodec::encrypt`].
    ///
    /// Fails with [`CodecError::DecryptionFailed`] on malformed input or a
    /// missing / incompatibly rotated key.
    fn decrypt(&self, ciphertext: &Ciphertext) -> CodecResult<Zeroizing<String>>;

    /// Checks that key material is readable without touching any secret.
    fn check_key(&self) -> CodecResult<()>;
}

/// Returns `true` if `value` is the redaction sentinel.
///
/// The sentinel never reaches the storage backend, so a real secret that
/// happened to equal it would simply never validate.
pub fn is_redaction_sentinel(value: &str) -> bool {
    value == REDACTION_SENTINEL
}

/// Returns the first and last two characters of `plaintext` around
/// [`MASK_FILLER`].
///
/// Inputs shorter than four characters yield the bare filler so nothing of
/// the secret is revealed.
pub fn masked_preview(plaintext: &str) -> String {
    let chars: Vec<char> = plaintext.chars().collect();
    if chars.len() < PREVIEW_EDGE * 2 {
        return MASK_FILLER.to_owned();
    }

    let head: String = chars[..PREVIEW_EDGE].iter().collect();
    let tail: String = chars[chars.len() - PREVIEW_EDGE..].iter().collect();
    format!("{head}{MASK_FILLER}{tail}")
}
