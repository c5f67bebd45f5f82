//! readmegen - AI-powered README generator
//!
//! This library scans a project directory, assembles its source files into a
//! token-bounded context, and generates a README.md through one of several
//! AI providers with bounded retry on transient failures.

// Allow certain clippy warnings that are either stylistic or from external dependencies
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::format_push_string)] // Performance improvement but stylistic
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine
#![allow(clippy::module_name_repetitions)] // Qualified names read better at call sites

pub mod assembler;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod generator;
pub mod llm_providers;
pub mod logger;
pub mod output;
pub mod prompt;
pub mod providers;
pub mod retry;
pub mod token_optimizer;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use config::{Config, ConfigOverrides};
pub use error::{Error, ErrorKind, Result};
pub use filter::{FileEntry, FilterRules, scan_project};
pub use providers::{GenerationResult, Provider, ProviderConfig};
