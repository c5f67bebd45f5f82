//! Error taxonomy for readmegen.
//!
//! Every failure surfaced by the core carries a stable kind so the CLI
//! layer can map it to an exit code and a one-line message without
//! inspecting error text.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias used throughout the core.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for all readmegen operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or conflicting user-supplied settings. Raised before any
    /// network call is made.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The root path is inaccessible or not a directory.
    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The provider rejected the credential. Never retried.
    #[error("Authentication failed for {provider}: {message}")]
    ProviderAuth { provider: String, message: String },

    /// The requested model is absent from the provider's current listing.
    #[error("Model '{model}' not found for {provider}. Available: {}", available.join(", "))]
    ModelNotFound {
        provider: String,
        model: String,
        available: Vec<String>,
    },

    /// A transient provider failure: timeout, rate limit, network error
    /// or server-side 5xx. Safe to retry within the budget.
    #[error("Transient provider error: {message}")]
    TransientProvider { message: String },

    /// The provider returned a well-formed rejection that retrying cannot
    /// fix (malformed request, unsupported parameter).
    #[error("Provider rejected the request: {message}")]
    ProviderRequest { message: String },

    /// The retry budget was exhausted. Carries the last underlying cause
    /// and the number of attempts made.
    #[error("Generation failed after {attempts} attempt(s): {source}")]
    GenerationFailed {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    /// The operation was interrupted by an external cancellation signal.
    #[error("Operation cancelled")]
    Cancelled,
}

/// Stable kind tags, one per taxonomy entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Filesystem,
    ProviderAuth,
    ModelNotFound,
    TransientProvider,
    ProviderRequest,
    GenerationFailed,
    Cancelled,
}

impl Error {
    /// Stable kind tag for this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
            Self::ProviderAuth { .. } => ErrorKind::ProviderAuth,
            Self::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            Self::TransientProvider { .. } => ErrorKind::TransientProvider,
            Self::ProviderRequest { .. } => ErrorKind::ProviderRequest,
            Self::GenerationFailed { .. } => ErrorKind::GenerationFailed,
            Self::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Whether the retry controller may reattempt after this error.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientProvider { .. })
    }

    /// Process exit code the CLI maps this error to.
    ///
    /// 1 = generic/API error, 2 = configuration error, 3 = filesystem error.
    pub const fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Configuration => 2,
            ErrorKind::Filesystem => 3,
            _ => 1,
        }
    }
}
