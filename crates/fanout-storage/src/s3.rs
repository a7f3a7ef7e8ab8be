use crate::traits::{ProvisionOutcome, RemoteStore, StorageError, StorageResult};
use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration, ObjectCannedAcl};
use bytes::Bytes;
use fanout_core::RemoteConfig;

/// S3 remote store implementation
#[derive(Clone)]
pub struct S3RemoteStore {
    client: aws_sdk_s3::Client,
    region: String,
}

impl std::fmt::Debug for S3RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3RemoteStore")
            .field("region", &self.region)
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3RemoteStore {
    /// Create a new S3RemoteStore
    ///
    /// Static credentials from the configuration win over the SDK default chain. A custom
    /// endpoint (MinIO, LocalStack) switches the client to path-style addressing.
    pub async fn new(config: &RemoteConfig) -> StorageResult<Self> {
        let mut loader =
            aws_config::from_env().region(aws_config::Region::new(config.region.clone()));

        if let (Some(id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                id.clone(),
                secret.clone(),
                None,
                None,
                "fanout-static",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            tracing::debug!(endpoint = %endpoint, "Using custom S3 endpoint");
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Ok(Self::with_client(
            aws_sdk_s3::Client::from_conf(s3_config),
            config.region.clone(),
        ))
    }

    /// Create an S3RemoteStore with a pre-built client.
    pub fn with_client(client: aws_sdk_s3::Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// us-east-1 rejects an explicit location constraint.
    fn bucket_configuration(&self) -> Option<CreateBucketConfiguration> {
        if self.region == "us-east-1" {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build(),
        )
    }
}

#[async_trait]
impl RemoteStore for S3RemoteStore {
    async fn ensure_namespace(
        &self,
        bucket: &str,
        namespace: &str,
    ) -> StorageResult<ProvisionOutcome> {
        let result = self
            .client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(self.bucket_configuration())
            .send()
            .await;

        match result {
            Ok(_) => {
                tracing::info!(bucket = %bucket, namespace = %namespace, "Bucket created");
                Ok(ProvisionOutcome::Created)
            }
            Err(e) => match e.into_service_error() {
                CreateBucketError::BucketAlreadyOwnedByYou(_)
                | CreateBucketError::BucketAlreadyExists(_) => {
                    tracing::debug!(bucket = %bucket, namespace = %namespace, "Bucket already exists");
                    Ok(ProvisionOutcome::AlreadyExists)
                }
                other => Err(StorageError::ProvisionFailed(format!(
                    "bucket {}: {}",
                    bucket,
                    DisplayErrorContext(&other)
                ))),
            },
        }
    }

    async fn put_public(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = data.len();
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                StorageError::UploadFailed(format!(
                    "s3://{}/{}: {}",
                    bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis() as u64,
            "Object uploaded to S3"
        );

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
