//! Object storage for post images.
//!
//! Uploaded files are written whole to an S3 bucket and the post keeps the
//! resulting public URL.

use async_trait::async_trait;
use aws_sdk_s3::{
    Client,
    config::{Credentials, Region},
    primitives::ByteStream,
};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("object storage rejected the upload: {0}")]
    Storage(String),
}

/// A file taken from a multipart body, ready to be stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `file` under `key` and returns the URL it can be fetched from.
    async fn put(&self, key: &str, file: UploadedFile) -> Result<String, UploadError>;
}

/// Builds a key that orders by upload time and cannot collide.
pub fn object_key() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple())
}

#[derive(Clone)]
pub struct S3Storage {
    client: Arc<Client>,
    bucket: String,
    region: String,
}

impl S3Storage {
    /// Build an S3 client from the static credentials in `config`.
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(&config.s3_key, &config.s3_secret, None, None, "forum");

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Self {
            client: Arc::new(Client::new(&shared_config)),
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        object_url(&self.bucket, &self.region, key)
    }
}

pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, file: UploadedFile) -> Result<String, UploadError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(file.content_type)
            .body(ByteStream::from(file.bytes))
            .send()
            .await
            .map_err(|e| UploadError::Storage(e.to_string()))?;

        Ok(self.object_url(key))
    }
}

/// Keeps uploaded objects in memory, addressed by a `memory://` URL.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<DashMap<String, UploadedFile>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<UploadedFile> {
        self.objects.get(key).map(|file| file.clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn put(&self, key: &str, file: UploadedFile) -> Result<String, UploadError> {
        self.objects.insert(key.to_string(), file);
        Ok(format!("memory://{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_key_starts_with_millis() {
        let before = Utc::now().timestamp_millis();
        let key = object_key();
        let (millis, suffix) = key.split_once('-').unwrap();

        assert!(millis.parse::<i64>().unwrap() >= before);
        assert_eq!(suffix.len(), 32);
        assert_ne!(object_key(), key);
    }

    #[test]
    fn object_url_is_virtual_hosted_style() {
        assert_eq!(
            object_url("taste-hub", "ap-northeast-2", "123-abc"),
            "https://taste-hub.s3.ap-northeast-2.amazonaws.com/123-abc"
        );
    }

    #[tokio::test]
    async fn memory_storage_keeps_bytes() {
        let storage = MemoryStorage::new();
        let file = UploadedFile {
            file_name: Some("cat.png".into()),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };

        let url = storage.put("k1", file).await.unwrap();

        assert_eq!(url, "memory://k1");
        assert_eq!(storage.get("k1").unwrap().bytes, vec![1, 2, 3]);
    }
}
