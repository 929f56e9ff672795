//! Amazon S3 backend built on the object_store crate.
//!
//! Credentials are resolved by `AmazonS3Builder::from_env`: the usual
//! `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
//! variables, web identity tokens, container credentials or the instance
//! metadata service.

use anyhow::{Context, Result};
use object_store::{aws::AmazonS3Builder, ObjectStore as ObjectStoreBackend};
use std::sync::Arc;

use crate::domain::value_objects::BucketName;

/// Connection settings for the S3 backend
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: BucketName,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services (MinIO, localstack, ...)
    pub endpoint: Option<String>,
    /// Allow plain http endpoints
    pub allow_http: bool,
}

impl S3Settings {
    pub fn new(bucket: BucketName) -> Self {
        Self {
            bucket,
            region: None,
            endpoint: None,
            allow_http: false,
        }
    }
}

/// Create an S3 store bound to one bucket
pub fn build_s3_store(settings: &S3Settings) -> Result<Arc<dyn ObjectStoreBackend>> {
    let mut builder = AmazonS3Builder::from_env().with_bucket_name(settings.bucket.as_str());

    if let Some(region) = &settings.region {
        builder = builder.with_region(region);
    }

    if let Some(endpoint) = &settings.endpoint {
        builder = builder
            .with_endpoint(endpoint)
            .with_virtual_hosted_style_request(false);
    }

    if settings.allow_http {
        builder = builder.with_allow_http(true);
    }

    let store = builder
        .build()
        .with_context(|| format!("Failed to build S3 store for bucket {}", settings.bucket))?;

    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_explicit_region_and_endpoint() {
        let mut settings = S3Settings::new(BucketName::new("backup-bucket".to_string()).unwrap());
        settings.region = Some("eu-west-1".to_string());
        settings.endpoint = Some("http://localhost:9000".to_string());
        settings.allow_http = true;

        assert!(build_s3_store(&settings).is_ok());
    }
}
