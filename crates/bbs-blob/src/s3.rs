use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bbs_types::ObjectName;
use bytes::Bytes;
use tracing::{debug, info};

use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// Default public base for object addresses.
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://storage.googleapis.com";

/// Blob store backed by an S3-compatible bucket.
///
/// Objects are addressed as `<public_base_url>/<bucket>/<name>`.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
    public_base_url: String,
    timeout: Duration,
}

impl S3BlobStore {
    /// Build a client from the ambient AWS configuration.
    ///
    /// A custom `endpoint` switches the client to path-style addressing,
    /// which is what MinIO and the GCS XML API expect.
    pub async fn connect(
        bucket: impl Into<String>,
        endpoint: Option<&str>,
        region: Option<&str>,
        public_base_url: impl Into<String>,
        timeout: Duration,
    ) -> BlobResult<Self> {
        let bucket = bucket.into();
        if bucket.trim().is_empty() {
            return Err(BlobError::Config("bucket name is empty".into()));
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(%bucket, endpoint = endpoint.unwrap_or("default"), "S3 blob store configured");
        Ok(Self::with_client(
            Client::from_conf(builder.build()),
            bucket,
            public_base_url,
            timeout,
        ))
    }

    /// Wrap an already configured client.
    pub fn with_client(
        client: Client,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Public address of `name` in this bucket.
    pub fn object_url(&self, name: &ObjectName) -> String {
        format!("{}/{}/{}", self.public_base_url, self.bucket, name)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        name: &ObjectName,
        body: Bytes,
        content_type: &str,
    ) -> BlobResult<String> {
        let size = body.len();
        let put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(name.as_str())
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send();

        match tokio::time::timeout(self.timeout, put).await {
            Ok(Ok(_)) => {
                debug!(%name, bucket = %self.bucket, bytes = size, "object uploaded");
                Ok(self.object_url(name))
            }
            Ok(Err(e)) => Err(BlobError::Write {
                name: name.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            }),
            Err(_) => Err(BlobError::Timeout {
                name: name.to_string(),
                after: self.timeout,
            }),
        }
    }

    async fn read(&self, name: &ObjectName) -> BlobResult<Option<Bytes>> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(name.as_str())
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    return Ok(None);
                }
                return Err(BlobError::Read {
                    name: name.to_string(),
                    reason: DisplayErrorContext(&e).to_string(),
                });
            }
        };

        let data = output.body.collect().await.map_err(|e| BlobError::Read {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(data.into_bytes()))
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
