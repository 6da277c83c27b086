use super::{StorageService, Visibility};
use crate::models::StorageConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::Region, types::ObjectCannedAcl, Client as S3Client};

pub struct S3StorageClient {
    client: S3Client,
    bucket: String,
    base_url: String,
}

impl S3StorageClient {
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "inframe-storage",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint.clone())
            .load()
            .await;

        let client = S3Client::new(&sdk_config);

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn public_url(&self, key: &str, visibility: Visibility) -> Option<String> {
        match visibility {
            Visibility::PublicRead => Some(format!("{}/{}", self.base_url, key)),
            Visibility::Private => None,
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    async fn upload(
        &self,
        data: &[u8],
        key: &str,
        content_type: &str,
        visibility: Visibility,
    ) -> Result<Option<String>> {
        let body = ByteStream::from(data.to_vec());
        let acl = match visibility {
            Visibility::PublicRead => ObjectCannedAcl::PublicRead,
            Visibility::Private => ObjectCannedAcl::Private,
        };

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .acl(acl)
            .send()
            .await
            .map_err(|e| Error::Storage(format!("Failed to upload {}: {}", key, e)))?;

        tracing::debug!("Uploaded {} ({} bytes) to bucket {}", key, data.len(), self.bucket);

        Ok(self.public_url(key, visibility))
    }
}
