use super::{GeneratedImage, ImageDownloader, ImageGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// A generation request observed by [`MockImageGenerationClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationCall {
    pub prompt: String,
    pub count: u32,
    pub size: String,
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<Vec<GeneratedImage>>>>,
    calls: Arc<Mutex<Vec<GenerationCall>>>,
    should_fail: bool,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub fn with_url_response(self, url: String) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(vec![GeneratedImage::Url(url)]);
        self
    }

    pub fn with_response(self, images: Vec<GeneratedImage>) -> Self {
        self.responses.lock().unwrap().push(images);
        self
    }

    pub fn with_failure(mut self, should_fail: bool) -> Self {
        self.should_fail = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate(&self, prompt: &str, count: u32, size: &str) -> Result<Vec<GeneratedImage>> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(GenerationCall {
            prompt: prompt.to_string(),
            count,
            size: size.to_string(),
        });

        if self.should_fail {
            return Err(Error::AiProvider("Mock failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Default mock response
            Ok(vec![GeneratedImage::Url(format!(
                "https://mock-images.example.com/{}.png",
                calls.len()
            ))])
        } else {
            let index = (calls.len() - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

/// Serves canned bodies by URL; unknown URLs get a tiny PNG.
#[derive(Clone)]
pub struct MockDownloader {
    bodies: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    downloads: Arc<Mutex<Vec<String>>>,
    should_fail: bool,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self {
            bodies: Arc::new(Mutex::new(HashMap::new())),
            downloads: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    pub fn with_body(self, url: String, body: Vec<u8>) -> Self {
        self.bodies.lock().unwrap().insert(url, body);
        self
    }

    pub fn with_failure(mut self, should_fail: bool) -> Self {
        self.should_fail = should_fail;
        self
    }

    pub fn get_downloads(&self) -> Vec<String> {
        self.downloads.lock().unwrap().clone()
    }
}

impl Default for MockDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageDownloader for MockDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.downloads.lock().unwrap().push(url.to_string());

        if self.should_fail {
            return Err(Error::AiProvider(
                "Artifact download failed with status 404 Not Found".to_string(),
            ));
        }

        let bodies = self.bodies.lock().unwrap();
        Ok(bodies.get(url).cloned().unwrap_or_else(|| {
            vec![
                0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
            ]
        }))
    }
}
