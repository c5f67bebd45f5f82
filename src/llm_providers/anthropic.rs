use super::{LLMBackend, classify_status, classify_transport, http_client};
use crate::error::{Error, Result};
use crate::providers::Provider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const BASE_URL: &str = "https://api.anthropic.com/v1";

/// Messages API version header Anthropic requires on every request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Messages API backend. Authenticates with an `x-api-key`
/// header rather than a bearer token.
pub struct AnthropicBackend {
    api_key: String,
    base_url: String,
    client: Client,
}

impl AnthropicBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            client: http_client(),
        }
    }

    /// Override the API endpoint, e.g. for a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{path}", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
    }
}

#[async_trait]
impl LLMBackend for AnthropicBackend {
    async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .request(reqwest::Method::GET, "/models")
            .send()
            .await
            .map_err(|e| classify_transport(Provider::Anthropic, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::Anthropic, status, &body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport(Provider::Anthropic, &e))?;

        let mut models: Vec<String> = body["data"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m["id"].as_str())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        models.sort();
        Ok(models)
    }

    async fn generate(&self, prompt: &str, model: &str, max_tokens: u32) -> Result<String> {
        let request_body = json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let response = self
            .request(reqwest::Method::POST, "/messages")
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| classify_transport(Provider::Anthropic, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::Anthropic, status, &body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport(Provider::Anthropic, &e))?;

        let text = body["content"][0]["text"].as_str().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::ProviderRequest {
                message: "Anthropic returned an empty response".to_string(),
            });
        }
        Ok(text.to_string())
    }
}
