//! Storage probe capability.

use zeroize::Zeroizing;

use crate::ValidationResult;

/// Candidate credentials for a single probe.
#[derive(Clone)]
pub struct ProbeRequest {
    /// Target bucket.
    pub bucket: String,
    /// Access key id.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: Zeroizing<String>,
}

impl ProbeRequest {
    /// Creates a new probe request.
    pub fn new(
        bucket: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            access_key: access_key.into(),
            secret_key: Zeroizing::new(secret_key.into()),
        }
    }
}

impl std::fmt::Debug for ProbeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeRequest")
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key)
            .finish_non_exhaustive()
    }
}

/// A read-only bucket metadata call against a storage backend.
///
/// Implementations must not mutate backend state and must classify their
/// failures. Timeouts are enforced by the caller.
#[async_trait::async_trait]
pub trait StorageProbe: Send + Sync {
    /// Probes the bucket with the given credentials.
    async fn probe(&self, request: &ProbeRequest) -> ValidationResult;

    /// Short backend name used in logs.
    fn backend_name(&self) -> &'static str;
}
