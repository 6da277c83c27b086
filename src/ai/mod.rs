//! Image generation integration
//!
//! Requests decorative frame backgrounds from OpenAI's Images API and fetches
//! the resulting artifacts.

pub mod download;
pub mod mock;
pub mod openai;

pub use download::HttpImageDownloader;
pub use mock::{GenerationCall, MockDownloader, MockImageGenerationClient};
pub use openai::OpenAiImageClient;

use crate::Result;
use async_trait::async_trait;

/// Square output size requested for AI frames.
pub const FRAME_IMAGE_SIZE: &str = "1024x1024";

/// One artifact returned by an image-generation provider.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedImage {
    /// Hosted by the provider; must be downloaded.
    Url(String),
    /// Returned inline, already decoded.
    Inline(Vec<u8>),
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate(&self, prompt: &str, count: u32, size: &str) -> Result<Vec<GeneratedImage>>;
}

#[async_trait]
pub trait ImageDownloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}
