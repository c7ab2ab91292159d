//! Prelude module for convenient imports.

pub use crate::probe::{ProbeRequest, StorageProbe};
#[cfg(feature = "s3")]
pub use crate::s3::{S3Probe, S3ProbeConfig};
pub use crate::validator::{StorageValidator, ValidatorConfig};
pub use crate::{StorageValidationError, ValidationResult};
