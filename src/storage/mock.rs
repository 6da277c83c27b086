use super::{StorageService, Visibility};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// An object captured by [`MockStorageClient`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub visibility: Visibility,
}

#[derive(Clone)]
pub struct MockStorageClient {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    base_url: String,
    upload_count: Arc<Mutex<usize>>,
    returns_url: bool,
    should_fail: bool,
}

impl MockStorageClient {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            base_url: "https://mock-storage.example.com".to_string(),
            upload_count: Arc::new(Mutex::new(0)),
            returns_url: true,
            should_fail: false,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Accept uploads but report no resulting URL.
    pub fn without_url(mut self) -> Self {
        self.returns_url = false;
        self
    }

    pub fn with_failure(mut self, should_fail: bool) -> Self {
        self.should_fail = should_fail;
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    pub fn get_objects(&self) -> HashMap<String, StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

impl Default for MockStorageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageClient {
    async fn upload(
        &self,
        data: &[u8],
        key: &str,
        content_type: &str,
        visibility: Visibility,
    ) -> Result<Option<String>> {
        if self.should_fail {
            return Err(Error::Storage("Mock failure".to_string()));
        }

        *self.upload_count.lock().unwrap() += 1;

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
                visibility,
            },
        );

        if self.returns_url {
            Ok(Some(format!("{}/{}", self.base_url, key)))
        } else {
            Ok(None)
        }
    }
}
