use crate::cli::ProviderArgs;
use crate::config::{Config, ConfigOverrides, mask_key};
use crate::filter::FilterRules;
use crate::generator;
use crate::log_debug;
use crate::output::write_readme;
use crate::providers::Provider;
use crate::ui;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Arguments for the `generate` command, flattened from the CLI.
pub struct GenerateArgs {
    pub provider: ProviderArgs,
    pub path: String,
    pub output: Option<String>,
    pub max_tokens: Option<u32>,
    pub max_retries: Option<u32>,
    pub retry_delay: Option<u64>,
    pub additional_context: Option<String>,
    pub ignore_dirs: Vec<String>,
    pub ignore_files: Vec<String>,
    pub ignore_extensions: Vec<String>,
    pub allow_extensions: Vec<String>,
    pub readme_filename: Option<String>,
    pub print: bool,
    pub no_backup: bool,
}

fn overrides_from(provider: &ProviderArgs) -> ConfigOverrides {
    ConfigOverrides {
        provider: provider.provider.clone(),
        model: provider.model.clone(),
        api_key: provider.api_key.clone(),
        ..ConfigOverrides::default()
    }
}

fn none_if_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

/// Install a ctrl-c handler that trips the returned token once.
fn cancellation_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log_debug!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });
    cancel
}

/// Handle the `generate` command
pub async fn handle_generate_command(args: GenerateArgs) -> Result<()> {
    let config = Config::load()?;
    let mut overrides = overrides_from(&args.provider);
    overrides.max_tokens = args.max_tokens;
    overrides.max_retries = args.max_retries;
    overrides.retry_delay = args.retry_delay;
    let provider_config = config.resolve(&overrides)?;

    let rules = FilterRules {
        ignore_dirs: args.ignore_dirs,
        ignore_files: args.ignore_files,
        ignore_extensions: none_if_empty(args.ignore_extensions),
        allow_extensions: none_if_empty(args.allow_extensions),
    };

    let root = Path::new(&args.path);
    let cancel = cancellation_on_ctrl_c();

    let spinner = ui::create_spinner(&format!(
        "Generating README with {} ({})...",
        provider_config.provider.name(),
        provider_config.model
    ));

    let result = generator::generate_readme(
        root,
        &rules,
        args.additional_context.as_deref().unwrap_or(""),
        &provider_config,
        &cancel,
    )
    .await;
    spinner.finish_and_clear();
    let generated = result?;

    if args.print {
        println!("{}", generated.text);
        return Ok(());
    }

    let out_dir = args.output.as_deref().map_or(root, Path::new);
    let filename = args.readme_filename.as_deref().unwrap_or("README.md");
    let written = write_readme(&generated.text, out_dir, filename, !args.no_backup)?;
    ui::print_success(&format!(
        "README generated with {} ({}) and written to {}",
        generated.provider.name(),
        generated.model,
        written.display()
    ));
    Ok(())
}

/// Handle the `list-models` command
pub async fn handle_list_models_command(provider: ProviderArgs) -> Result<()> {
    let config = Config::load()?;
    let provider_config = config.resolve(&overrides_from(&provider))?;

    let spinner = ui::create_spinner(&format!(
        "Fetching models for {}...",
        provider_config.provider.name()
    ));
    let result = generator::list_models(&provider_config).await;
    spinner.finish_and_clear();
    let models = result?;

    ui::print_info(&format!(
        "Models available for {}:",
        provider_config.provider.name()
    ));
    for model in models {
        if model == provider_config.model {
            println!("  {} {}", model.green().bold(), "(configured)".dimmed());
        } else {
            println!("  {model}");
        }
    }
    Ok(())
}

/// Handle the `configure` command
pub fn handle_configure_command(
    provider: ProviderArgs,
    max_tokens: Option<u32>,
    max_retries: Option<u32>,
    retry_delay: Option<u64>,
) -> Result<()> {
    let mut config = Config::load()?;
    let mut overrides = overrides_from(&provider);
    overrides.max_tokens = max_tokens;
    overrides.max_retries = max_retries;
    overrides.retry_delay = retry_delay;
    config.update(&overrides)?;
    config.save()?;
    ui::print_success(&format!(
        "Configuration saved to {}",
        Config::config_path()?.display()
    ));
    Ok(())
}

/// Handle the `configure-show` command
pub fn handle_configure_show_command() -> Result<()> {
    let config = Config::load()?;

    println!(
        "{}: {}",
        "Default provider".cyan().bold(),
        config.default_provider
    );
    println!(
        "{}: max_tokens={}, max_retries={}, retry_delay={}s",
        "Defaults".cyan().bold(),
        config.defaults.max_tokens,
        config.defaults.max_retries,
        config.defaults.retry_delay
    );
    for provider in Provider::ALL {
        let stored = config.providers.get(provider.name());
        let api_key = stored.map_or_else(String::new, |s| s.api_key.clone());
        let model = stored
            .map(|s| s.model.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("{} (default)", provider.default_model()));
        println!(
            "  {}: model={}, api_key={}",
            provider.name().green(),
            model,
            mask_key(&api_key)
        );
    }
    Ok(())
}

/// Handle the `configure-reset` command
pub fn handle_configure_reset_command() -> Result<()> {
    Config::reset()?;
    ui::print_success("Configuration reset to defaults");
    Ok(())
}
