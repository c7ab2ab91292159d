//! Storage validation error types.

use strum::IntoStaticStr;

/// Result type for storage validation.
pub type ValidationResult<T = ()> = Result<T, StorageValidationError>;

/// S3 error codes that mean the keys themselves were rejected.
const AUTHENTICATION_CODES: &[&str] = &[
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "InvalidToken",
    "ExpiredToken",
];

/// S3 error codes for a request sent to the wrong region.
///
/// The keys were never checked, so these must not read as bad credentials.
const REGION_MISMATCH_CODES: &[&str] = &[
    "AuthorizationHeaderMalformed",
    "PermanentRedirect",
    "IllegalLocationConstraintException",
];

/// S3 error code for a bucket that does not exist.
const NO_SUCH_BUCKET: &str = "NoSuchBucket";

/// Classified outcome of a failed credential probe.
///
/// Every variant keeps the backend's message verbatim for operator display.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr, thiserror::Error)]
#[strum(serialize_all = "snake_case")]
pub enum StorageValidationError {
    /// The access key or secret key was rejected.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The keys are valid but the bucket does not exist.
    #[error("bucket not found: {0}")]
    BucketNotFound(String),

    /// The keys are valid but are not allowed to access the bucket.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The backend could not be reached in time.
    #[error("network error: {0}")]
    NetworkError(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    UnknownBackendError(String),
}

impl StorageValidationError {
    /// Returns the classification as a static string.
    pub fn kind_str(&self) -> &'static str {
        self.into()
    }

    /// Returns the backend message.
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationFailed(msg)
            | Self::BucketNotFound(msg)
            | Self::AccessDenied(msg)
            | Self::NetworkError(msg)
            | Self::UnknownBackendError(msg) => msg,
        }
    }
}

impl From<opendal::Error> for StorageValidationError {
    fn from(err: opendal::Error) -> Self {
        use opendal::ErrorKind;

        let message = err.to_string();

        if REGION_MISMATCH_CODES.iter().any(|code| message.contains(code)) {
            return Self::UnknownBackendError(message);
        }
        if AUTHENTICATION_CODES.iter().any(|code| message.contains(code)) {
            return Self::AuthenticationFailed(message);
        }
        if message.contains(NO_SUCH_BUCKET) {
            return Self::BucketNotFound(message);
        }

        match err.kind() {
            ErrorKind::NotFound => Self::BucketNotFound(message),
            ErrorKind::PermissionDenied => Self::AccessDenied(message),
            ErrorKind::RateLimited => Self::NetworkError(message),
            _ if err.is_temporary() => Self::NetworkError(message),
            _ => Self::UnknownBackendError(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use opendal::{Error, ErrorKind};

    use super::*;

    #[test]
    fn test_authentication_codes() {
        let err = Error::new(
            ErrorKind::PermissionDenied,
            "S3Error { code: \"InvalidAccessKeyId\", message: \"The AWS Access Key Id you provided does not exist\" }",
        );
        let classified = StorageValidationError::from(err);

        assert!(matches!(classified, StorageValidationError::AuthenticationFailed(_)));
        assert!(classified.message().contains("InvalidAccessKeyId"));

        let err = Error::new(ErrorKind::Unexpected, "SignatureDoesNotMatch");
        assert!(matches!(
            StorageValidationError::from(err),
            StorageValidationError::AuthenticationFailed(_)
        ));
    }

    #[test]
    fn test_region_mismatch_is_not_authentication() {
        let err = Error::new(
            ErrorKind::Unexpected,
            "S3Error { code: \"AuthorizationHeaderMalformed\", message: \"The authorization \
             header is malformed; the region 'us-east-1' is wrong; expecting 'eu-west-1'\" }",
        );
        let classified = StorageValidationError::from(err);

        assert!(matches!(classified, StorageValidationError::UnknownBackendError(_)));
        assert!(classified.message().contains("expecting 'eu-west-1'"));
    }

    #[test]
    fn test_permission_denied_is_access_denied() {
        let err = Error::new(ErrorKind::PermissionDenied, "S3Error { code: \"AccessDenied\" }");
        assert!(matches!(
            StorageValidationError::from(err),
            StorageValidationError::AccessDenied(_)
        ));
    }

    #[test]
    fn test_missing_bucket() {
        let err = Error::new(ErrorKind::NotFound, "bucket does not exist");
        assert!(matches!(
            StorageValidationError::from(err),
            StorageValidationError::BucketNotFound(_)
        ));

        let err = Error::new(ErrorKind::Unexpected, "S3Error { code: \"NoSuchBucket\" }");
        assert!(matches!(
            StorageValidationError::from(err),
            StorageValidationError::BucketNotFound(_)
        ));
    }

    #[test]
    fn test_temporary_is_network_error() {
        let err = Error::new(ErrorKind::Unexpected, "error sending request").set_temporary();
        assert!(matches!(
            StorageValidationError::from(err),
            StorageValidationError::NetworkError(_)
        ));
    }

    #[test]
    fn test_unknown_preserves_message() {
        let err = Error::new(ErrorKind::Unexpected, "teapot");
        let classified = StorageValidationError::from(err);

        assert!(matches!(classified, StorageValidationError::UnknownBackendError(_)));
        assert!(classified.to_string().contains("teapot"));
        assert_eq!(classified.kind_str(), "unknown_backend_error");
    }
}
