//! Encryption key source configuration.

use std::path::PathBuf;

use clap::Args;
use serde::{Deserialize, Serialize};
use sweep_core::codec::KeySource;

/// Environment variable read for the key when no key file is given.
pub const DEFAULT_KEY_ENV: &str = "SWEEP_KEY";

/// Where the secret codec reads its key material.
///
/// The key is re-read on every operation, so rotating or removing it takes
/// effect without a restart.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct KeyConfig {
    /// File holding the base64 encryption key
    #[arg(long = "key-file", env = "SWEEP_KEY_FILE")]
    pub key_file: Option<PathBuf>,

    /// Environment variable holding the base64 encryption key
    #[arg(long = "key-env", env = "SWEEP_KEY_ENV", default_value = DEFAULT_KEY_ENV)]
    pub key_env: String,
}

impl KeyConfig {
    /// Returns the configured key source; a key file takes precedence.
    pub fn key_source(&self) -> KeySource {
        match &self.key_file {
            Some(path) => KeySource::File(path.clone()),
            None => KeySource::Env(self.key_env.clone()),
        }
    }

    /// Describes the key source for logs without revealing key material.
    pub fn describe(&self) -> String {
        match &self.key_file {
            Some(path) => format!("file:{}", path.display()),
            None => format!("env:{}", self.key_env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_file_takes_precedence() {
        let config = KeyConfig {
            key_file: Some(PathBuf::from("/etc/sweep/key")),
            key_env: DEFAULT_KEY_ENV.to_owned(),
        };

        assert!(matches!(config.key_source(), KeySource::File(_)));
        assert_eq!(config.describe(), "file:/etc/sweep/key");
    }

    #[test]
    fn test_env_fallback() {
        let config = KeyConfig {
            key_file: None,
            key_env: "JOB_KEY".to_owned(),
        };

        assert!(matches!(config.key_source(), KeySource::Env(name) if name == "JOB_KEY"));
    }
}
