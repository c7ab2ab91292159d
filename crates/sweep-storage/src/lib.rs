#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod probe;
mod validator;

#[cfg(feature = "s3")]
#[cfg_attr(docsrs, doc(cfg(feature = "s3")))]
mod s3;

#[doc(hidden)]
pub mod prelude;

pub use error::{StorageValidationError, ValidationResult};
pub use probe::{ProbeRequest, StorageProbe};
#[cfg(feature = "s3")]
pub use s3::{S3Probe, S3ProbeConfig};
pub use validator::{DEFAULT_PROBE_TIMEOUT_SECS, StorageValidator, ValidatorConfig};

/// Tracing target for storage validation.
pub const TRACING_TARGET: &str = "sweep_storage";
