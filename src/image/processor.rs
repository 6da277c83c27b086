use super::ImageService;
use crate::{Error, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

const JPEG_QUALITY: u8 = 85;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    fn encode_jpeg_sync(image: DynamicImage) -> Result<Vec<u8>> {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());

        let mut bytes = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)?;
        Ok(bytes)
    }
}

#[async_trait]
impl ImageService for ImageProcessor {
    async fn reencode_jpeg(&self, image_data: &[u8]) -> Result<Vec<u8>> {
        let data = image_data.to_vec();

        tokio::task::spawn_blocking(move || {
            let img = image::load_from_memory(&data)?;
            tracing::debug!("Decoded {}x{} upload", img.width(), img.height());
            Self::encode_jpeg_sync(img)
        })
        .await
        .map_err(|e| Error::Invariant(format!("Image processing task join error: {}", e)))?
    }
}
