//! OpenDAL-backed S3 probe.

use futures::TryStreamExt;
use opendal::{Operator, services};

use super::S3ProbeConfig;
use crate::probe::{ProbeRequest, StorageProbe};
use crate::{TRACING_TARGET, ValidationResult};

/// Endpoint used to look up bucket regions when none is configured.
const AWS_ENDPOINT: &str = "https://s3.amazonaws.com";

/// Probes an S3 bucket by reading the first entry of its root listing.
///
/// The request is signed for the bucket's own region, looked up before each
/// probe; the configured region is used when the lookup gives no answer.
/// Only the submitted keys are used: credential discovery from the
/// environment, profile files and instance metadata is disabled.
#[derive(Debug, Clone, Default)]
pub struct S3Probe {
    config: S3ProbeConfig,
}

impl S3Probe {
    /// Creates a new S3 probe.
    pub fn new(config: S3ProbeConfig) -> Self {
        Self { config }
    }

    /// Returns the probe configuration.
    pub fn config(&self) -> &S3ProbeConfig {
        &self.config
    }

    /// Returns the region `bucket` lives in, or the configured region.
    async fn resolve_region(&self, bucket: &str) -> String {
        let endpoint = self
            .config
            .endpoint
            .as_ref()
            .map_or(AWS_ENDPOINT, |url| url.as_str())
            .trim_end_matches('/');

        match services::S3::detect_region(endpoint, bucket).await {
            Some(region) => region,
            None => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    bucket = %bucket,
                    fallback = self.config.effective_region(),
                    "Bucket region not detected, using configured region"
                );
                self.config.effective_region().to_owned()
            }
        }
    }

    fn create_operator(&self, request: &ProbeRequest, region: &str) -> ValidationResult<Operator> {
        let mut builder = services::S3::default()
            .bucket(&request.bucket)
            .region(region)
            .access_key_id(&request.access_key)
            .secret_access_key(request.secret_key.as_str())
            .disable_config_load()
            .disable_ec2_metadata();

        if let Some(ref endpoint) = self.config.endpoint {
            builder = builder.endpoint(endpoint.as_str());
        }

        Ok(Operator::new(builder)?.finish())
    }
}

#[async_trait::async_trait]
impl StorageProbe for S3Probe {
    async fn probe(&self, request: &ProbeRequest) -> ValidationResult {
        let region = self.resolve_region(&request.bucket).await;
        let operator = self.create_operator(request, &region)?;

        tracing::trace!(
            target: TRACING_TARGET,
            bucket = %request.bucket,
            region = %region,
            endpoint = ?self.config.endpoint.as_ref().map(|url| url.as_str()),
            "Listing bucket root"
        );

        // The first page is enough to prove list access; errors surface on it.
        let mut lister = std::pin::pin!(operator.lister("/").await?);
        lister.try_next().await?;

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
