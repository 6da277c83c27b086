//! Object storage for uploaded and generated frame images
//!
//! Frames are stored in S3-compatible storage and served to clients through
//! a public base URL.

pub mod client;
pub mod mock;

pub use client::S3StorageClient;
pub use mock::MockStorageClient;

use crate::Result;
use async_trait::async_trait;

/// Access level applied to an uploaded object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    PublicRead,
    Private,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    /// Store `data` under `key`.
    ///
    /// Returns the public URL of the object, or `None` when the backend has no
    /// URL to hand out for it.
    async fn upload(
        &self,
        data: &[u8],
        key: &str,
        content_type: &str,
        visibility: Visibility,
    ) -> Result<Option<String>>;
}
