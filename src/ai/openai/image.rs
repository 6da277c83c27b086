use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::{GeneratedImage, ImageGenerationService};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;
        Ok(Self::new_with_client(api_key, model, client))
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new(api_key, client),
            model,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate(&self, prompt: &str, count: u32, size: &str) -> Result<Vec<GeneratedImage>> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: count,
            size: size.to_string(),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        if response.data.is_empty() {
            return Err(Error::AiProvider(
                "No image data in OpenAI response".to_string(),
            ));
        }

        response
            .data
            .into_iter()
            .map(|item| {
                if let Some(url) = item.url {
                    Ok(GeneratedImage::Url(url))
                } else if let Some(b64_json) = item.b64_json {
                    use base64::Engine as _;
                    base64::engine::general_purpose::STANDARD
                        .decode(b64_json)
                        .map(GeneratedImage::Inline)
                        .map_err(|e| {
                            Error::AiProvider(format!("Failed to decode base64 image: {}", e))
                        })
                } else {
                    Err(Error::AiProvider(
                        "No image data (neither URL nor base64) in response".to_string(),
                    ))
                }
            })
            .collect()
    }
}
