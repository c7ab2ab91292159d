//! Scripted storage probe.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use sweep_storage::{ProbeRequest, StorageProbe, StorageValidationError, ValidationResult};

/// A storage probe that returns a preset result.
///
/// Counts how often it was called and keeps the last request so tests can
/// assert on what would have been sent to the backend.
#[derive(Debug)]
pub struct MockProbe {
    result: Mutex<ValidationResult>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ProbeRequest>>,
}

impl MockProbe {
    /// Creates a probe that answers every call with `result`.
    pub fn new(result: ValidationResult) -> Self {
        Self {
            result: Mutex::new(result),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Creates a probe that accepts every credential.
    pub fn accepting() -> Self {
        Self::new(Ok(()))
    }

    /// Creates a probe that rejects every credential with `error`.
    pub fn rejecting(error: StorageValidationError) -> Self {
        Self::new(Err(error))
    }

    /// Replaces the result returned by later calls.
    pub fn set_result(&self, result: ValidationResult) {
        *self.result.lock().unwrap_or_else(|e| e.into_inner()) = result;
    }

    /// Returns the number of probe calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the most recent request, if any.
    pub fn last_request(&self) -> Option<ProbeRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::accepting()
    }
}

#[async_trait::async_trait]
impl StorageProbe for MockProbe {
    async fn probe(&self, request: &ProbeRequest) -> ValidationResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap_or_else(|e| e.into_inner()) = Some(request.clone());
        self.result
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sweep_storage::StorageValidator;

    use super::*;

    #[tokio::test]
    async fn test_records_calls() {
        let probe = Arc::new(MockProbe::accepting());
        let validator = StorageValidator::from_arc(probe.clone());

        validator.validate("archive", "AKIA", "secret").await.unwrap();

        assert_eq!(probe.calls(), 1);
        let request = probe.last_request().unwrap();
        assert_eq!(request.bucket, "archive");
        assert_eq!(request.secret_key.as_str(), "secret");
    }

    #[tokio::test]
    async fn test_scripted_rejection() {
        let probe = Arc::new(MockProbe::rejecting(StorageValidationError::AccessDenied(
            "AccessDenied".into(),
        )));
        let validator = StorageValidator::from_arc(probe.clone());

        let err = validator.validate("archive", "AKIA", "secret").await.unwrap_err();
        assert!(matches!(err, StorageValidationError::AccessDenied(_)));

        probe.set_result(Ok(()));
        assert!(validator.validate("archive", "AKIA", "secret").await.is_ok());
        assert_eq!(probe.calls(), 2);
    }
}
