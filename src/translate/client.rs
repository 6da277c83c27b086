use super::Translator;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com";

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Translation {
    translated_text: String,
}

/// Google Cloud Translation (v2 REST) client.
pub struct GoogleTranslateClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleTranslateClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::new_with_client(api_key, client))
    }

    pub fn new_with_client(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> Result<String> {
        if source_lang == target_lang {
            return Ok(text.to_string());
        }

        let url = format!("{}/language/translate/v2", self.base_url);
        let request = TranslateRequest {
            q: text,
            source: source_lang,
            target: target_lang,
            format: "text",
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to translation API: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Translation API error (status {}): {}", status, error_text);
            return Err(Error::Translation(format!(
                "Translation API error (status {}): {}",
                status, error_text
            )));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| Error::Translation(format!("Failed to parse translation: {}", e)))?;

        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| Error::Translation("No translation in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GoogleTranslateClient {
        GoogleTranslateClient::new("test-key".to_string())
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_translate_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .and(query_param("key", "test-key"))
            .and(body_json(serde_json::json!({
                "q": "노을",
                "source": "ko",
                "target": "en",
                "format": "text"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "translations": [{ "translatedText": "sunset" }] }
            })))
            .mount(&server)
            .await;

        let translated = client_for(&server)
            .translate("노을", "ko", "en")
            .await
            .unwrap();

        assert_eq!(translated, "sunset");
    }

    #[tokio::test]
    async fn test_translate_same_language_skips_request() {
        let server = MockServer::start().await;

        let translated = client_for(&server)
            .translate("sunset", "en", "en")
            .await
            .unwrap();

        assert_eq!(translated, "sunset");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_translate_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key invalid"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .translate("노을", "ko", "en")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Translation(msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn test_translate_empty_translations() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/language/translate/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "translations": [] }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .translate("노을", "ko", "en")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Translation(_)));
    }
}
