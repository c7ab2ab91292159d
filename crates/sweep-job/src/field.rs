//! Typed identifiers for the fields of the job configuration.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};

use crate::store::KeyPath;

/// Store namespace holding the job configuration.
pub const NAMESPACE: &str = "deletion_job";

/// A field of the job configuration.
///
/// Each field knows both its form name (used in error reports) and its
/// location in the configuration store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    IntoStaticStr,
    Display,
    EnumIter,
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobField {
    /// Whether the job runs.
    Enabled,
    /// Run frequency.
    Frequency,
    /// Addresses notified on success.
    EmailOnSuccess,
    /// Addresses notified on failure.
    EmailOnFailure,
    /// Target bucket.
    BucketName,
    /// Storage access key id.
    AccessKey,
    /// Storage secret key.
    SecretKey,
    /// Prefix for written object keys.
    ObjectKeyPrefix,
}

impl JobField {
    /// Fields that must be filled in before the job may be enabled.
    pub const REQUIRED_WHEN_ENABLED: [JobField; 4] = [
        JobField::Frequency,
        JobField::BucketName,
        JobField::AccessKey,
        JobField::SecretKey,
    ];

    /// Returns the location of this field in the configuration store.
    pub const fn key_path(self) -> KeyPath {
        let segments: &'static [&'static str] = match self {
            Self::Enabled => &[NAMESPACE, "enabled"],
            Self::Frequency => &[NAMESPACE, "frequency_seconds"],
            Self::EmailOnSuccess => &[NAMESPACE, "email_on_success"],
            Self::EmailOnFailure => &[NAMESPACE, "email_on_failure"],
            Self::BucketName => &[NAMESPACE, "storage", "bucket_name"],
            Self::AccessKey => &[NAMESPACE, "storage", "access_key"],
            Self::SecretKey => &[NAMESPACE, "storage", "secret_key"],
            Self::ObjectKeyPrefix => &[NAMESPACE, "storage", "object_key_prefix"],
        };
        KeyPath::new(segments)
    }
}
