use super::ImageDownloader;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Fetches generated artifacts from the provider's CDN.
pub struct HttpImageDownloader {
    client: Client,
}

impl HttpImageDownloader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageDownloader for HttpImageDownloader {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Artifact download failed (status {}): {}", status, url);
            return Err(Error::AiProvider(format!(
                "Artifact download failed with status {}",
                status
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_returns_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/artifact.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8, 2, 3]))
            .mount(&server)
            .await;

        let downloader = HttpImageDownloader::new(Duration::from_secs(5)).unwrap();
        let bytes = downloader
            .download(&format!("{}/artifact.png", server.uri()))
            .await
            .unwrap();

        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_download_non_success_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/expired.png"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let downloader = HttpImageDownloader::new(Duration::from_secs(5)).unwrap();
        let err = downloader
            .download(&format!("{}/expired.png", server.uri()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_download_times_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/slow.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0u8])
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let downloader = HttpImageDownloader::new(Duration::from_millis(50)).unwrap();
        let err = downloader
            .download(&format!("{}/slow.png", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Http(_)));
    }
}
