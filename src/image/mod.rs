//! Image decoding and re-encoding
//!
//! Uploaded frames arrive in whatever format the client produced and are
//! normalised to JPEG before they are stored.

pub mod mock;
pub mod processor;

pub use mock::MockImageProcessor;
pub use processor::ImageProcessor;

use crate::Result;
use async_trait::async_trait;

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";
pub const PNG_CONTENT_TYPE: &str = "image/png";

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Decode `image_data` and re-encode it as JPEG.
    async fn reencode_jpeg(&self, image_data: &[u8]) -> Result<Vec<u8>>;
}
