//! Amazon S3 probe configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings shared by every S3 probe.
///
/// Credentials are not part of this configuration; they come from the
/// submission being validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct S3ProbeConfig {
    /// AWS region of the bucket
    #[cfg_attr(
        feature = "config",
        arg(long = "s3-region", env = "S3_REGION", default_value = DEFAULT_REGION)
    )]
    #[serde(default = "default_region")]
    pub region: String,

    /// Custom endpoint for S3-compatible storage (MinIO, R2, ...)
    #[cfg_attr(feature = "config", arg(long = "s3-endpoint", env = "S3_ENDPOINT"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Url>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_owned()
}

impl Default for S3ProbeConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            endpoint: None,
        }
    }
}

impl S3ProbeConfig {
    /// Creates a configuration for the given region.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: None,
        }
    }

    /// Sets the custom endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Returns the effective region, using the default if blank.
    pub fn effective_region(&self) -> &str {
        let region = self.region.trim();
        if region.is_empty() {
            DEFAULT_REGION
        } else {
            region
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = S3ProbeConfig::default();
        assert_eq!(config.region, "us-east-1");
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_blank_region_falls_back() {
        assert_eq!(S3ProbeConfig::new("  ").effective_region(), DEFAULT_REGION);
        assert_eq!(S3ProbeConfig::new("eu-west-1").effective_region(), "eu-west-1");
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: S3ProbeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, S3ProbeConfig::default());
    }
}
