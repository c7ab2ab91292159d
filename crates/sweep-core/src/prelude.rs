//! Prelude module for convenient imports.

pub use crate::codec::{
    CipherCodec, Ciphertext, CodecError, CodecResult, KeySource, REDACTION_SENTINEL, SecretCodec,
    is_redaction_sentinel, masked_preview,
};
pub use crate::crypto::EncryptionKey;
pub use crate::{Error, ErrorKind, Result};
