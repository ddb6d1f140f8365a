use crate::traits::{BlobError, BlobResult, BlobStore};
use async_trait::async_trait;
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Tag, Tagging};
use aws_sdk_s3::Client;
use bytes::Bytes;

/// S3 blob store implementation
#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Create a new S3BlobStore instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (falls back to the environment when `None`)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g. "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: Option<String>,
        endpoint_url: Option<String>,
    ) -> BlobResult<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        if let Some(ref endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let sdk_config = loader.load().await;

        // S3-compatible providers generally require path-style addressing.
        let client = if endpoint_url.is_some() {
            let conf = aws_sdk_s3::config::Builder::from(&sdk_config)
                .force_path_style(true)
                .build();
            Client::from_conf(conf)
        } else {
            Client::new(&sdk_config)
        };

        Ok(S3BlobStore { client, bucket })
    }
}

fn is_no_such_key(code: Option<&str>) -> bool {
    matches!(code, Some("NoSuchKey") | Some("NotFound") | Some("404"))
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> BlobResult<()> {
        let size = data.len() as u64;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 put failed"
                );
                BlobError::PutFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            "S3 put successful"
        );
        Ok(())
    }

    async fn copy(&self, from_key: &str, to_key: &str) -> BlobResult<()> {
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, from_key))
            .key(to_key)
            .send()
            .await
            .map_err(|e| {
                if is_no_such_key(e.code()) {
                    BlobError::NotFound(from_key.to_string())
                } else {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        from_key = %from_key,
                        to_key = %to_key,
                        "S3 copy failed"
                    );
                    BlobError::CopyFailed(e.to_string())
                }
            })?;

        tracing::info!(
            bucket = %self.bucket,
            from_key = %from_key,
            to_key = %to_key,
            "S3 copy successful"
        );
        Ok(())
    }

    async fn tag(&self, key: &str, tags: &[(&str, &str)]) -> BlobResult<()> {
        let mut tag_set = Vec::with_capacity(tags.len());
        for (name, value) in tags {
            let tag = Tag::builder()
                .key(*name)
                .value(*value)
                .build()
                .map_err(|e| BlobError::TagFailed(e.to_string()))?;
            tag_set.push(tag);
        }
        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| BlobError::TagFailed(e.to_string()))?;

        self.client
            .put_object_tagging()
            .bucket(&self.bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| {
                if is_no_such_key(e.code()) {
                    BlobError::NotFound(key.to_string())
                } else {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %key,
                        "S3 tag failed"
                    );
                    BlobError::TagFailed(e.to_string())
                }
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, "S3 tag successful");
        Ok(())
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        // S3 DeleteObject already succeeds for absent keys; a retried delete
        // therefore never surfaces NotFound from this backend.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 delete failed"
                );
                BlobError::DeleteFailed(e.to_string())
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, "S3 delete successful");
        Ok(())
    }

    async fn exists(&self, key: &str) -> BlobResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(BlobError::ConfigError(service_error.to_string()))
                }
            }
        }
    }
}
