//! Token budget enforcement for the assembled context.
//!
//! When the rendered payload would exceed the provider's token budget,
//! whole files are dropped starting from the lowest-priority entry until
//! the estimate fits. Priority is deterministic and documented:
//!
//! 1. Manifest and entry-point file names (e.g. `Cargo.toml`, `main.py`)
//!    rank highest;
//! 2. shallower paths rank above deeper ones;
//! 3. ties break lexicographically by relative path.
//!
//! The user's additional-context note is never dropped; its tokens are
//! reserved up front. If the single highest-priority file still exceeds
//! the remaining budget on its own, its content is truncated rather than
//! dropped so the payload is never empty.

use crate::context::{FileContent, OmittedReason, ProjectContext};
use crate::error::{Error, Result};
use crate::log_debug;
use tiktoken_rs::cl100k_base;

/// File names treated as project manifests or entry points for ranking.
const HIGH_PRIORITY_NAMES: &[&str] = &[
    "Cargo.toml",
    "package.json",
    "pyproject.toml",
    "setup.py",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "Makefile",
    "Dockerfile",
    "main.py",
    "main.rs",
    "main.go",
    "app.py",
    "index.js",
    "index.ts",
    "lib.rs",
];

pub struct TokenOptimizer {
    encoder: tiktoken_rs::CoreBPE,
    max_tokens: usize,
}

impl TokenOptimizer {
    pub fn new(max_tokens: usize) -> Result<Self> {
        let encoder = cl100k_base().map_err(|e| {
            Error::Configuration(format!("failed to load cl100k_base tokenizer: {e}"))
        })?;
        Ok(Self {
            encoder,
            max_tokens,
        })
    }

    /// Enforce the budget on `context`, dropping or truncating content
    /// in place. Updates `context.token_estimate` to the final count.
    pub fn optimize_context(&self, context: &mut ProjectContext) {
        let reserved = if context.additional_context.is_empty() {
            0
        } else {
            self.count_tokens(&context.additional_context)
        };
        let file_budget = self.max_tokens.saturating_sub(reserved);

        let mut file_tokens: Vec<usize> = context
            .files
            .iter()
            .map(|f| f.content_str().map_or(0, |c| self.count_tokens(c)))
            .collect();
        let mut total: usize = file_tokens.iter().sum();

        if total > file_budget {
            log_debug!(
                "Context estimate {} exceeds file budget {}, dropping low-priority files",
                total,
                file_budget
            );
            // Indices from lowest to highest priority; drop from the front.
            let mut drop_order: Vec<usize> = (0..context.files.len())
                .filter(|&i| matches!(context.files[i].content, FileContent::Included(_)))
                .collect();
            drop_order.sort_by(|&a, &b| {
                priority_key(&context.files[b].entry.relative_path)
                    .cmp(&priority_key(&context.files[a].entry.relative_path))
            });
            let keep_idx = drop_order.last().copied();

            for &idx in &drop_order {
                if total <= file_budget {
                    break;
                }
                if Some(idx) == keep_idx {
                    // Highest-priority file is handled by truncation below.
                    continue;
                }
                log_debug!(
                    "Dropping {} ({} tokens) to fit budget",
                    context.files[idx].entry.relative_path,
                    file_tokens[idx]
                );
                total -= file_tokens[idx];
                file_tokens[idx] = 0;
                context.files[idx].content = FileContent::Omitted(OmittedReason::OverBudget);
            }

            if total > file_budget
                && let Some(idx) = keep_idx
                && let FileContent::Included(content) = &context.files[idx].content
            {
                let keep = file_budget.saturating_sub(total - file_tokens[idx]);
                log_debug!(
                    "Truncating {} from {} to {} tokens",
                    context.files[idx].entry.relative_path,
                    file_tokens[idx],
                    keep
                );
                let truncated = self.truncate_string(content, keep);
                total -= file_tokens[idx];
                file_tokens[idx] = self.count_tokens(&truncated);
                total += file_tokens[idx];
                context.files[idx].content = if truncated.is_empty() {
                    FileContent::Omitted(OmittedReason::OverBudget)
                } else {
                    FileContent::Included(truncated)
                };
            }
        }

        context.token_estimate = total + reserved;
        log_debug!("Final token estimate: {}", context.token_estimate);
    }

    /// Truncate a string to fit within the given token limit, appending an
    /// ellipsis when anything was cut.
    pub fn truncate_string(&self, s: &str, max_tokens: usize) -> String {
        let tokens = self.encoder.encode_ordinary(s);
        if tokens.len() <= max_tokens {
            return s.to_string();
        }
        if max_tokens == 0 {
            return String::new();
        }

        let truncation_limit = max_tokens.saturating_sub(1);
        let mut truncated = tokens.get(..truncation_limit).unwrap_or(&tokens).to_vec();
        let ellipsis = self.encoder.encode_ordinary("…").first().copied();
        if let Some(ellipsis) = ellipsis {
            truncated.push(ellipsis);
        }
        // A token boundary can split a multibyte character; back off one
        // content token at a time until the prefix decodes cleanly.
        while !truncated.is_empty() {
            match self.encoder.decode(truncated.clone()) {
                Ok(decoded) => return decoded,
                Err(_) => {
                    truncated.truncate(truncated.len().saturating_sub(2));
                    if let Some(ellipsis) = ellipsis
                        && !truncated.is_empty()
                    {
                        truncated.push(ellipsis);
                    }
                }
            }
        }
        String::new()
    }

    /// Count the number of tokens in a string.
    pub fn count_tokens(&self, s: &str) -> usize {
        self.encoder.encode_ordinary(s).len()
    }
}

/// Ranking key: lower sorts first (higher priority).
fn priority_key(relative_path: &str) -> (u8, usize, &str) {
    let name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    let tier = u8::from(!HIGH_PRIORITY_NAMES.contains(&name));
    let depth = relative_path.matches('/').count();
    (tier, depth, relative_path)
}
