//! Cryptographic primitives for secrets kept at rest.
//!
//! Provides authenticated encryption with XChaCha20-Poly1305 and the 256-bit
//! [`EncryptionKey`] it runs on. Higher layers should go through
//! [`crate::codec::SecretCodec`] rather than calling these functions directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use sweep_core::crypto::{EncryptionKey, encrypt, decrypt};
//!
//! let key = EncryptionKey::generate();
//! let ciphertext = encrypt(&key, b"sensitive credentials")?;
//! let decrypted = decrypt(&key, &ciphertext)?;
//! assert_eq!(b"sensitive credentials", decrypted.as_slice());
//! ```

mod cipher;
mod error;
mod key;

pub use cipher::{MIN_CIPHERTEXT_SIZE, NONCE_SIZE, TAG_SIZE, decrypt, encrypt};
pub use error::{CryptoError, CryptoResult};
pub use key::{EncryptionKey, KEY_SIZE};
