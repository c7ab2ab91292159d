//! Job configuration model and its operator-facing forms.

mod configuration;
mod display;
mod frequency;
mod submission;

pub use configuration::{JobConfiguration, StorageCredential};
pub use display::{DisplayForm, LoadWarning, LoadedForm};
pub use frequency::Frequency;
pub use submission::{SecretInput, Submission};
