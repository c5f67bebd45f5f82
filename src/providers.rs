//! AI provider configuration.
//!
//! Single source of truth for supported backends and their defaults.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bounds for the numeric generation settings.
pub const MAX_TOKENS_RANGE: (u32, u32) = (100, 4096);
pub const MAX_RETRIES_RANGE: (u32, u32) = (1, 10);
pub const RETRY_DELAY_RANGE: (u64, u64) = (1, 30);

/// Supported AI backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAI,
    Anthropic,
}

impl Provider {
    /// All available providers.
    pub const ALL: &'static [Provider] =
        &[Provider::Gemini, Provider::OpenAI, Provider::Anthropic];

    /// Provider name as used in config files and CLI.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Default model when none is configured.
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::OpenAI => "gpt-4o",
            Self::Anthropic => "claude-sonnet-4-5-20250929",
        }
    }

    /// Environment variable holding the provider-specific API key.
    pub const fn api_key_env(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Get all provider names as strings.
    pub fn all_names() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::name).collect()
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_lowercase();
        // Handle legacy "google" and "claude" aliases
        let normalized = match lower.as_str() {
            "google" => "gemini",
            "claude" => "anthropic",
            other => other,
        };

        Self::ALL
            .iter()
            .find(|p| p.name() == normalized)
            .copied()
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "Unknown provider: {s}. Supported: {}",
                    Self::all_names().join(", ")
                ))
            })
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Fully resolved provider settings for one invocation. Constructed once
/// by the configuration resolver and immutable thereafter.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub model: String,
    pub api_key: String,
    /// Token budget for the assembled context (100..=4096).
    pub max_tokens: u32,
    /// Total generation attempts (1..=10).
    pub max_retries: u32,
    /// Fixed delay between attempts in seconds (1..=30).
    pub retry_delay: u64,
}

impl ProviderConfig {
    /// Check numeric bounds and credential presence. A violation is a
    /// configuration error raised before any network call.
    pub fn validate(&self) -> Result<()> {
        check_range(
            "max-tokens",
            u64::from(self.max_tokens),
            (u64::from(MAX_TOKENS_RANGE.0), u64::from(MAX_TOKENS_RANGE.1)),
        )?;
        check_range(
            "max-retries",
            u64::from(self.max_retries),
            (
                u64::from(MAX_RETRIES_RANGE.0),
                u64::from(MAX_RETRIES_RANGE.1),
            ),
        )?;
        check_range("retry-delay", self.retry_delay, RETRY_DELAY_RANGE)?;
        if self.api_key.is_empty() {
            return Err(Error::Configuration(format!(
                "No API key found for {}. Pass --api-key, set README_API_KEY or {}, or run 'readmegen configure'",
                self.provider,
                self.provider.api_key_env()
            )));
        }
        if self.model.is_empty() {
            return Err(Error::Configuration("Model must not be empty".to_string()));
        }
        Ok(())
    }
}

fn check_range(flag: &str, value: u64, (min, max): (u64, u64)) -> Result<()> {
    if value < min || value > max {
        return Err(Error::Configuration(format!(
            "--{flag} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

/// Outcome of a successful generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// The generated README text.
    pub text: String,
    /// Which backend produced it.
    pub provider: Provider,
    /// The model identifier actually used.
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn config() -> ProviderConfig {
        ProviderConfig {
            provider: Provider::Gemini,
            model: "gemini-2.0-flash".to_string(),
            api_key: "test-key".to_string(),
            max_tokens: 4096,
            max_retries: 3,
            retry_delay: 2,
        }
    }

    #[test]
    fn test_provider_from_str() {
        assert_eq!("gemini".parse::<Provider>().ok(), Some(Provider::Gemini));
        assert_eq!("OpenAI".parse::<Provider>().ok(), Some(Provider::OpenAI));
        assert_eq!(
            "claude".parse::<Provider>().ok(),
            Some(Provider::Anthropic)
        );
        assert_eq!("google".parse::<Provider>().ok(), Some(Provider::Gemini));
        assert!("invalid".parse::<Provider>().is_err());
    }

    #[test]
    fn test_provider_defaults() {
        assert_eq!(Provider::Gemini.default_model(), "gemini-2.0-flash");
        assert_eq!(Provider::Anthropic.api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(Provider::default(), Provider::Gemini);
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut c = config();
        c.max_tokens = 99;
        assert_eq!(c.validate().expect_err("low").kind(), ErrorKind::Configuration);

        let mut c = config();
        c.max_tokens = 5000;
        assert!(c.validate().is_err());

        let mut c = config();
        c.max_retries = 0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.max_retries = 11;
        assert!(c.validate().is_err());

        let mut c = config();
        c.retry_delay = 0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.retry_delay = 31;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let mut c = config();
        c.api_key = String::new();
        let err = c.validate().expect_err("no key");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
