use super::{LLMBackend, classify_status, classify_transport, http_client};
use crate::error::{Error, Result};
use crate::providers::Provider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions backend. Authenticates with a bearer token.
pub struct OpenAIBackend {
    api_key: String,
    base_url: String,
    client: Client,
}

impl OpenAIBackend {
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
}

#[async_trait]
impl LLMBackend for OpenAIBackend {
    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| classify_transport(Provider::OpenAI, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::OpenAI, status, &body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport(Provider::OpenAI, &e))?;

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
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "max_tokens": max_tokens
        });

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| classify_transport(Provider::OpenAI, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::OpenAI, status, &body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport(Provider::OpenAI, &e))?;

        let text = body["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::ProviderRequest {
                message: "OpenAI returned an empty response".to_string(),
            });
        }
        Ok(text.to_string())
    }
}
