//! Load, validate and commit the job configuration.

use std::sync::Arc;

use sweep_core::Result;
use sweep_core::codec::SecretCodec;
use sweep_storage::StorageValidator;

use crate::TRACING_TARGET_CONTROLLER;
use crate::field::JobField;
use crate::model::{DisplayForm, JobConfiguration, LoadWarning, LoadedForm, Submission};
use crate::store::ConfigStore;
use crate::validation::{FieldErrorKind, ValidationErrors};

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission was valid and has been saved.
    Persisted(JobConfiguration),
    /// The submission was rejected; nothing was written.
    Rejected(ValidationErrors),
}

impl SubmitOutcome {
    /// Returns `true` if the submission was saved.
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted(_))
    }
}

/// Mediates between the operator form and the stored configuration.
///
/// Every collaborator is injected; the controller holds no state of its own
/// and concurrent submissions resolve as last writer wins.
#[derive(Clone)]
pub struct JobController {
    store: Arc<dyn ConfigStore>,
    codec: Arc<dyn SecretCodec>,
    validator: StorageValidator,
}

impl JobController {
    /// Creates a new controller.
    pub fn new(
        store: Arc<dyn ConfigStore>,
        codec: Arc<dyn SecretCodec>,
        validator: StorageValidator,
    ) -> Self {
        Self {
            store,
            codec,
            validator,
        }
    }

    /// Returns the stored configuration, or defaults if none was saved.
    pub fn configuration(&self) -> Result<JobConfiguration> {
        JobConfiguration::read_from(self.store.as_ref())
    }

    /// Prepares the stored configuration for display.
    ///
    /// Unreadable key material and undecryptable secrets are reported as
    /// warnings on the returned form.
    pub fn load(&self) -> Result<LoadedForm> {
        let configuration = self.configuration()?;
        let mut loaded = configuration.to_display(self.codec.as_ref());

        if let Err(err) = self.codec.check_key() {
            loaded.warnings.insert(0, LoadWarning::from(err));
        }

        for warning in &loaded.warnings {
            tracing::warn!(
                target: TRACING_TARGET_CONTROLLER,
                warning = %warning,
                "Configuration loaded with warning"
            );
        }

        tracing::debug!(
            target: TRACING_TARGET_CONTROLLER,
            enabled = configuration.enabled,
            has_secret = configuration.storage.has_secret(),
            "Configuration loaded"
        );

        Ok(loaded)
    }

    /// Validates a submitted form without saving it.
    ///
    /// Returns every field error found; an empty set means the form would
    /// be accepted. Format errors are reported before any other check runs.
    pub async fn validate(&self, form: &DisplayForm) -> Result<ValidationErrors> {
        let existing = self.configuration()?;
        let errors = match form.parse() {
            Ok(submission) => self.check(&submission, &existing).await,
            Err(errors) => errors,
        };

        Ok(errors)
    }

    /// Validates and, if valid, saves a submitted form.
    ///
    /// The record is written with one atomic save. A rejected submission
    /// leaves the stored configuration untouched.
    pub async fn submit(&self, form: &DisplayForm) -> Result<SubmitOutcome> {
        let existing = self.configuration()?;

        let submission = match form.parse() {
            Ok(submission) => submission,
            Err(errors) => return Ok(self.reject(errors)),
        };

        let errors = self.check(&submission, &existing).await;
        if !errors.is_empty() {
            return Ok(self.reject(errors));
        }

        let replaced_secret = submission.secret_key.is_replacement();
        let configuration = match submission.into_configuration(&existing, self.codec.as_ref()) {
            Ok(configuration) => configuration,
            Err(errors) => return Ok(self.reject(errors)),
        };

        self.store.save(configuration.changeset())?;

        tracing::info!(
            target: TRACING_TARGET_CONTROLLER,
            enabled = configuration.enabled,
            frequency_seconds = configuration.frequency.map(|f| f.seconds()),
            bucket = %configuration.storage.bucket_name,
            replaced_secret,
            "Configuration saved"
        );

        Ok(SubmitOutcome::Persisted(configuration))
    }

    /// Runs the required-field rules and the storage probe.
    async fn check(&self, submission: &Submission, existing: &JobConfiguration) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if !submission.enabled {
            tracing::debug!(
                target: TRACING_TARGET_CONTROLLER,
                "Job disabled, skipping required fields and storage probe"
            );
            return errors;
        }

        for field in submission.missing_required(existing) {
            errors.add(field, FieldErrorKind::ConfigurationIncomplete);
        }

        let secret = match submission.effective_secret(existing, self.codec.as_ref()) {
            Ok(secret) => secret,
            Err(err) => {
                errors.add(JobField::SecretKey, err);
                None
            }
        };

        if !errors.is_empty() {
            return errors;
        }

        let Some(secret) = secret else {
            errors.add(JobField::SecretKey, FieldErrorKind::ConfigurationIncomplete);
            return errors;
        };

        if let Err(err) = self
            .validator
            .validate(&submission.bucket_name, &submission.access_key, &secret)
            .await
        {
            errors.add(JobField::SecretKey, err);
        }

        errors
    }

    fn reject(&self, errors: ValidationErrors) -> SubmitOutcome {
        tracing::info!(
            target: TRACING_TARGET_CONTROLLER,
            error_count = errors.len(),
            fields = ?errors.fields(),
            "Configuration rejected"
        );
        SubmitOutcome::Rejected(errors)
    }
}

impl std::fmt::Debug for JobController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobController")
            .field("timeout", &self.validator.timeout())
            .finish_non_exhaustive()
    }
}
