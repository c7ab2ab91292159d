//! Mock implementations of the storage and codec capabilities.
//!
//! The probe mock never touches the network; the codec is the real
//! [`CipherCodec`] with a throwaway key, so ciphertexts behave exactly as in
//! production.

mod probe;

use std::sync::Arc;

pub use probe::MockProbe;
use sweep_core::codec::{CipherCodec, KeySource};
use sweep_core::crypto::EncryptionKey;
use sweep_storage::StorageValidator;

/// Creates a codec with a freshly generated in-memory key.
///
/// Two calls yield codecs that cannot read each other's ciphertexts.
pub fn test_codec() -> CipherCodec {
    CipherCodec::new(KeySource::Static(EncryptionKey::generate()))
}

/// Creates a validator backed by an accepting mock probe.
///
/// Returns the probe as well so tests can inspect its calls.
pub fn mock_validator() -> (StorageValidator, Arc<MockProbe>) {
    let probe = Arc::new(MockProbe::accepting());
    (StorageValidator::from_arc(probe.clone()), probe)
}
