//! Core generation pipeline: scan, assemble, validate, generate.
//!
//! These are the entry points the CLI layer calls. Both take a fully
//! resolved [`ProviderConfig`] and never touch configuration files or
//! process state themselves.

use crate::assembler::assemble;
use crate::error::{Error, Result};
use crate::filter::{FilterRules, scan_project};
use crate::llm_providers::{LLMBackend, backend_for, validate_model};
use crate::prompt::build_prompt;
use crate::providers::{GenerationResult, ProviderConfig};
use crate::retry::RetryController;
use crate::{log_debug, log_info};
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Generate README text for the project at `root`.
///
/// Validates the configuration and the requested model before any
/// generation call is made; an unknown model fails fast with
/// [`Error::ModelNotFound`] and `generate` is never invoked.
pub async fn generate_readme(
    root: &Path,
    rules: &FilterRules,
    additional_context: &str,
    config: &ProviderConfig,
    cancel: &CancellationToken,
) -> Result<GenerationResult> {
    config.validate()?;
    rules.validate()?;

    let files = scan_project(root, rules)?;
    log_info!("Scanned {} file(s) under {}", files.len(), root.display());

    let context = assemble(
        files,
        additional_context.to_string(),
        config.max_tokens as usize,
        cancel,
    )
    .await?;
    log_debug!(
        "Assembled context: {} file(s) included, ~{} tokens",
        context.included_count(),
        context.token_estimate
    );

    let backend = backend_for(config.provider, &config.api_key);
    check_model(backend.as_ref(), config).await?;

    let prompt = build_prompt(&context);
    let retry = RetryController::new(
        config.max_retries,
        Duration::from_secs(config.retry_delay),
        cancel.clone(),
    );
    let text = retry
        .run(|| backend.generate(&prompt, &config.model, config.max_tokens))
        .await?;

    Ok(GenerationResult {
        text,
        provider: config.provider,
        model: config.model.clone(),
    })
}

/// List the models the configured credential has access to.
pub async fn list_models(config: &ProviderConfig) -> Result<Vec<String>> {
    config.validate()?;
    let backend = backend_for(config.provider, &config.api_key);
    backend.list_models().await
}

async fn check_model(backend: &dyn LLMBackend, config: &ProviderConfig) -> Result<()> {
    let available = backend.list_models().await?;
    if !validate_model(&config.model, &available) {
        return Err(Error::ModelNotFound {
            provider: config.provider.name().to_string(),
            model: config.model.clone(),
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::providers::Provider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubBackend {
        models: Vec<String>,
        generate_calls: AtomicU32,
    }

    #[async_trait]
    impl LLMBackend for StubBackend {
        async fn list_models(&self) -> Result<Vec<String>> {
            Ok(self.models.clone())
        }

        async fn generate(&self, _: &str, _: &str, _: u32) -> Result<String> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            Ok("# README".to_string())
        }
    }

    fn config(model: &str) -> ProviderConfig {
        ProviderConfig {
            provider: Provider::Gemini,
            model: model.to_string(),
            api_key: "key".to_string(),
            max_tokens: 1024,
            max_retries: 3,
            retry_delay: 1,
        }
    }

    #[tokio::test]
    async fn test_unknown_model_fails_without_generate() {
        let backend = StubBackend {
            models: vec!["gemini-2.0-flash".to_string()],
            generate_calls: AtomicU32::new(0),
        };
        let err = check_model(&backend, &config("gemini-9000"))
            .await
            .expect_err("unknown model");

        assert_eq!(err.kind(), ErrorKind::ModelNotFound);
        assert!(err.to_string().contains("gemini-2.0-flash"));
        assert_eq!(backend.generate_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_known_model_passes() {
        let backend = StubBackend {
            models: vec!["gemini-2.0-flash".to_string()],
            generate_calls: AtomicU32::new(0),
        };
        check_model(&backend, &config("gemini-2.0-flash"))
            .await
            .expect("known model");
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_any_call() {
        let mut c = config("gemini-2.0-flash");
        c.max_tokens = 1_000_000;
        let err = generate_readme(
            Path::new("/tmp"),
            &FilterRules::default(),
            "",
            &c,
            &CancellationToken::new(),
        )
        .await
        .expect_err("bad config");
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
