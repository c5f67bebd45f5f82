//! Uniform interface over the supported AI backends.
//!
//! Each backend implements the same capability set: list models and
//! generate content. All call sites dispatch through [`LLMBackend`];
//! nothing outside this module branches on provider identity. The layer
//! is stateless across calls and never persists credentials.

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicBackend;
pub use gemini::GeminiBackend;
pub use openai::OpenAIBackend;

use crate::error::{Error, Result};
use crate::providers::Provider;
use async_trait::async_trait;
use std::time::Duration;

/// HTTP timeout for a single provider request. A timeout classifies as
/// transient and is handled by the retry controller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The capability set every backend implements.
#[async_trait]
pub trait LLMBackend: Send + Sync {
    /// List the model identifiers the credential has access to, sorted.
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Generate text for `prompt` with the given model. `max_tokens`
    /// bounds the response length.
    async fn generate(&self, prompt: &str, model: &str, max_tokens: u32) -> Result<String>;
}

/// Construct the backend for a provider. The only place in the crate that
/// maps provider identity to an implementation.
pub fn backend_for(provider: Provider, api_key: &str) -> Box<dyn LLMBackend> {
    match provider {
        Provider::Gemini => Box::new(GeminiBackend::new(api_key)),
        Provider::OpenAI => Box::new(OpenAIBackend::new(api_key)),
        Provider::Anthropic => Box::new(AnthropicBackend::new(api_key)),
    }
}

/// Check a requested model against a provider's current listing.
pub fn validate_model(model: &str, available: &[String]) -> bool {
    available.iter().any(|m| m == model)
}

/// Shared HTTP client builder for all backends.
fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

/// Map an HTTP error status to the error taxonomy.
///
/// 401/403 are credential failures, 408/429 and 5xx are transient, every
/// other 4xx is a malformed request that retrying cannot fix.
fn classify_status(provider: Provider, status: reqwest::StatusCode, body: &str) -> Error {
    let message = format!("{provider} returned {status}: {}", snippet(body));
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Error::ProviderAuth {
            provider: provider.name().to_string(),
            message,
        };
    }
    if status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
    {
        return Error::TransientProvider { message };
    }
    Error::ProviderRequest { message }
}

/// Map a transport-level failure (connect, timeout, decode) to the
/// taxonomy. All of these are transient.
fn classify_transport(provider: Provider, e: &reqwest::Error) -> Error {
    let detail = if e.is_timeout() { "timed out" } else { "request failed" };
    Error::TransientProvider {
        message: format!("{provider} {detail}: {e}"),
    }
}

fn snippet(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map_or(body.len(), |(idx, _)| idx);
    body.get(..end).unwrap_or(body).trim_end()
}
