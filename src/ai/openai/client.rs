use super::types::ApiErrorResponse;
use crate::{Error, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Authenticated JSON transport for the OpenAI REST API.
pub struct OpenAiHttpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiHttpClient {
    pub fn new(api_key: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub async fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        request: &Req,
    ) -> Result<Resp> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .inspect_err(|e| tracing::error!("OpenAI request to {} failed: {}", path, e))?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = provider_message(status, &body);
            tracing::error!("OpenAI {} returned {}: {}", path, status, detail);
            return Err(Error::AiProvider(detail));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!("Unparseable OpenAI body: {}", body);
            Error::AiProvider(format!("Malformed OpenAI response: {}", e))
        })
    }
}

/// Prefer the provider's own error message (e.g. a content-policy refusal)
/// over the raw body.
fn provider_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => format!("OpenAI error {}: {}", status.as_u16(), parsed.error.message),
        Err(_) => format!("OpenAI error {}: {}", status.as_u16(), body.trim()),
    }
}
