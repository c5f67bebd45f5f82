use super::{LLMBackend, classify_status, classify_transport, http_client};
use crate::error::{Error, Result};
use crate::providers::Provider;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini backend. Authenticates with a `?key=` query parameter.
pub struct GeminiBackend {
    api_key: String,
    base_url: String,
    client: Client,
}

impl GeminiBackend {
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
impl LLMBackend for GeminiBackend {
    async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models?key={}", self.base_url, self.api_key);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport(Provider::Gemini, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::Gemini, status, &body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport(Provider::Gemini, &e))?;

        // Model names come back as "models/gemini-..."; strip the prefix.
        let mut models: Vec<String> = body["models"]
            .as_array()
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| m["name"].as_str())
                    .map(|name| name.trim_start_matches("models/").to_string())
                    .collect()
            })
            .unwrap_or_default();
        models.sort();
        Ok(models)
    }

    async fn generate(&self, prompt: &str, model: &str, max_tokens: u32) -> Result<String> {
        let request_body = json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [
                        {"text": prompt}
                    ]
                }
            ],
            "generationConfig": {
                "maxOutputTokens": max_tokens
            }
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| classify_transport(Provider::Gemini, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(Provider::Gemini, status, &body));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| classify_transport(Provider::Gemini, &e))?;

        let text = body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::ProviderRequest {
                message: "Gemini returned an empty response".to_string(),
            });
        }
        Ok(text.to_string())
    }
}
