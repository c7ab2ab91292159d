//! Prelude module for convenient imports.

pub use crate::controller::{JobController, SubmitOutcome};
pub use crate::field::JobField;
pub use crate::model::{DisplayForm, Frequency, JobConfiguration, LoadWarning, LoadedForm};
pub use crate::reader::{JobReader, ScheduledJob};
pub use crate::store::{ConfigStore, FileStore, MemoryStore};
pub use crate::validation::{FieldErrorKind, ValidationErrors};
