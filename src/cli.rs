use crate::commands;
use crate::log_debug;
use crate::providers::Provider;
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand, crate_version};
use colored::Colorize;

const LOG_FILE: &str = "readmegen-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "readmegen: AI-powered README generator",
    long_about = "readmegen scans a project directory, assembles its source files into a token-bounded context, and asks an AI provider to write a README.md for it.",
    disable_version_flag = true,
    after_help = get_dynamic_help(),
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, progress messages, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,

    /// Enable debug mode with detailed error causes and verbose logging
    #[arg(
        long = "debug",
        global = true,
        help = "Enable debug mode with detailed error causes and verbose logging"
    )]
    pub debug: bool,
}

/// Provider and generation arguments shared by commands that talk to a backend
#[derive(Args, Debug, Clone, Default)]
pub struct ProviderArgs {
    /// AI provider to use (gemini, openai, anthropic)
    #[arg(long, help = "AI provider to use (gemini, openai, anthropic)")]
    pub provider: Option<String>,

    /// Model to use instead of the provider default
    #[arg(long, help = "Model to use instead of the provider default")]
    pub model: Option<String>,

    /// API key for the provider
    #[arg(long, help = "API key for the provider")]
    pub api_key: Option<String>,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
#[command(subcommand_negates_reqs = true)]
#[command(subcommand_precedence_over_arg = true)]
pub enum Commands {
    /// Generate a README for a project directory
    #[command(
        about = "Generate a README.md using AI",
        long_about = "Scan the project directory, build a token-bounded context from its files, and generate a README.md with the configured AI provider.",
        after_help = get_dynamic_help()
    )]
    Generate {
        #[command(flatten)]
        provider: ProviderArgs,

        /// Project directory to scan
        #[arg(
            short,
            long,
            default_value = ".",
            help = "Project directory to scan"
        )]
        path: String,

        /// Directory to write the README into (defaults to the scanned directory)
        #[arg(short, long, help = "Directory to write the README into")]
        output: Option<String>,

        /// Maximum tokens for the generated README and the context budget
        #[arg(long, help = "Maximum tokens for generation (100-4096)")]
        max_tokens: Option<u32>,

        /// Maximum generation attempts for transient failures
        #[arg(long, help = "Maximum generation attempts (1-10)")]
        max_retries: Option<u32>,

        /// Seconds to wait between attempts
        #[arg(long, help = "Seconds to wait between attempts (1-30)")]
        retry_delay: Option<u64>,

        /// Extra instructions appended to the repository context
        #[arg(
            short = 'c',
            long,
            help = "Extra instructions appended to the repository context"
        )]
        additional_context: Option<String>,

        /// Additional directory names to skip during the scan
        #[arg(long = "dirs-to-ignore", help = "Additional directory name to skip")]
        ignore_dirs: Vec<String>,

        /// Additional file name patterns to skip (supports * and ?)
        #[arg(
            long = "files-to-ignore",
            help = "Additional file name pattern to skip (supports * and ?)"
        )]
        ignore_files: Vec<String>,

        /// Extensions to exclude from the scan
        #[arg(
            long = "ignore-extensions",
            conflicts_with = "allow_extensions",
            help = "Extension to exclude from the scan"
        )]
        ignore_extensions: Vec<String>,

        /// Only include files with these extensions
        #[arg(
            long = "allow-extensions",
            help = "Only include files with this extension (repeatable)"
        )]
        allow_extensions: Vec<String>,

        /// Name of the README file to write
        #[arg(
            long = "readme-filename",
            help = "Name of the README file to write (defaults to README.md)"
        )]
        readme_filename: Option<String>,

        /// Print the generated README to stdout instead of writing a file
        #[arg(short = 'P', long, help = "Print the README to stdout and exit")]
        print: bool,

        /// Overwrite an existing README.md without creating a backup
        #[arg(long, help = "Overwrite an existing README.md without a .bak backup")]
        no_backup: bool,
    },

    /// List the models available to the configured credential
    #[command(about = "List models available for a provider")]
    ListModels {
        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Configure readmegen settings and providers
    #[command(about = "Configure readmegen settings and providers")]
    Configure {
        #[command(flatten)]
        provider: ProviderArgs,

        /// Set the default token limit
        #[arg(long, help = "Set the default token limit (100-4096)")]
        max_tokens: Option<u32>,

        /// Set the default attempt budget
        #[arg(long, help = "Set the default attempt budget (1-10)")]
        max_retries: Option<u32>,

        /// Set the default delay between attempts
        #[arg(long, help = "Set the default delay between attempts in seconds (1-30)")]
        retry_delay: Option<u64>,
    },

    /// Print the current configuration with credentials masked
    #[command(about = "Show the current configuration")]
    ConfigureShow,

    /// Delete the stored configuration and restore defaults
    #[command(about = "Reset the stored configuration")]
    ConfigureReset,
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Generate dynamic help including available AI providers
fn get_dynamic_help() -> String {
    let providers_list = Provider::ALL
        .iter()
        .map(|p| format!("{}", p.name().bold()))
        .collect::<Vec<_>>()
        .join(" • ");

    format!("\nAvailable AI Providers: {providers_list}")
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if cli.debug {
        ui::set_debug_mode(true);
        crate::logger::enable_logging();
        crate::logger::set_log_to_stdout(true);
        crate::logger::set_verbose_logging(true);
    }

    if let Some(command) = cli.command {
        handle_command(command).await
    } else {
        // If no subcommand is provided, print the help
        let _ = Cli::parse_from(["readmegen", "--help"]);
        Ok(())
    }
}

/// Handle the command based on parsed arguments
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            provider,
            path,
            output,
            max_tokens,
            max_retries,
            retry_delay,
            additional_context,
            ignore_dirs,
            ignore_files,
            ignore_extensions,
            allow_extensions,
            readme_filename,
            print,
            no_backup,
        } => {
            log_debug!(
                "Handling 'generate' command with provider: {:?}, path: {}, print: {}",
                provider,
                path,
                print
            );
            commands::handle_generate_command(commands::GenerateArgs {
                provider,
                path,
                output,
                max_tokens,
                max_retries,
                retry_delay,
                additional_context,
                ignore_dirs,
                ignore_files,
                ignore_extensions,
                allow_extensions,
                readme_filename,
                print,
                no_backup,
            })
            .await
        }
        Commands::ListModels { provider } => {
            log_debug!("Handling 'list-models' command with provider: {:?}", provider);
            commands::handle_list_models_command(provider).await
        }
        Commands::Configure {
            provider,
            max_tokens,
            max_retries,
            retry_delay,
        } => {
            log_debug!("Handling 'configure' command with provider: {:?}", provider);
            commands::handle_configure_command(provider, max_tokens, max_retries, retry_delay)
        }
        Commands::ConfigureShow => commands::handle_configure_show_command(),
        Commands::ConfigureReset => commands::handle_configure_reset_command(),
    }
}
