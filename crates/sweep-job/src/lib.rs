#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod controller;
mod field;
mod model;
mod reader;
mod store;
mod validation;

#[doc(hidden)]
pub mod prelude;

pub use controller::{JobController, SubmitOutcome};
pub use field::{JobField, NAMESPACE};
pub use model::{
    DisplayForm, Frequency, JobConfiguration, LoadWarning, LoadedForm, SecretInput,
    StorageCredential, Submission,
};
pub use reader::{JobReader, ScheduledJob};
pub use store::{Changeset, ConfigStore, FileStore, KeyPath, MemoryStore};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};

/// Tracing target for the configuration controller.
pub const TRACING_TARGET_CONTROLLER: &str = "sweep_job::controller";

/// Tracing target for configuration store operations.
pub const TRACING_TARGET_STORE: &str = "sweep_job::store";
