//! Assembled project context sent to the AI backend.

use crate::filter::FileEntry;
use std::fmt;

/// Why a file's content was left out of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmittedReason {
    /// The bytes could not be decoded as UTF-8 text.
    NotText,
    /// The file could not be read (permission, disappeared mid-run).
    Unreadable(String),
    /// Dropped to fit the token budget.
    OverBudget,
}

impl fmt::Display for OmittedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotText => write!(f, "not valid UTF-8 text"),
            Self::Unreadable(e) => write!(f, "unreadable: {e}"),
            Self::OverBudget => write!(f, "dropped to fit token budget"),
        }
    }
}

/// A file's contribution to the context: its content, or the reason it was
/// left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Included(String),
    Omitted(OmittedReason),
}

/// One (file, content) pair in the assembled context.
#[derive(Debug, Clone)]
pub struct ContextFile {
    pub entry: FileEntry,
    pub content: FileContent,
}

impl ContextFile {
    pub fn content_str(&self) -> Option<&str> {
        match &self.content {
            FileContent::Included(text) => Some(text),
            FileContent::Omitted(_) => None,
        }
    }
}

/// The ordered, budget-bounded textual description of a project.
///
/// Built fresh on every run and discarded after the generation call.
/// Deterministic: an unchanged tree and unchanged rules always render to
/// byte-identical output.
#[derive(Debug, Clone, Default)]
pub struct ProjectContext {
    /// Files in lexicographic relative-path order.
    pub files: Vec<ContextFile>,
    /// Free-text note supplied by the user, appended after all files.
    pub additional_context: String,
    /// Token estimate for the rendered payload.
    pub token_estimate: usize,
}

impl ProjectContext {
    /// Render the payload: one `=== path ===` header per included file,
    /// contents in canonical order, additional context last.
    pub fn render(&self) -> String {
        let mut payload = String::new();
        for file in &self.files {
            if let Some(content) = file.content_str() {
                payload.push_str(&format!(
                    "\n=== {} ===\n{}\n",
                    file.entry.relative_path, content
                ));
            }
        }
        if payload.is_empty() {
            payload.push_str("No readable file content found in the repository.");
        }
        if !self.additional_context.is_empty() {
            payload.push_str(&format!(
                "\n\nAdditional Context Provided by User:\n{}",
                self.additional_context
            ));
        }
        payload
    }

    /// Number of files whose content made it into the payload.
    pub fn included_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.content, FileContent::Included(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(rel: &str) -> FileEntry {
        FileEntry {
            path: PathBuf::from(format!("/project/{rel}")),
            relative_path: rel.to_string(),
            extension: rel.rsplit('.').next().map(String::from),
            size: 0,
        }
    }

    #[test]
    fn test_render_orders_files_and_appends_context() {
        let ctx = ProjectContext {
            files: vec![
                ContextFile {
                    entry: entry("a.py"),
                    content: FileContent::Included("print('a')".to_string()),
                },
                ContextFile {
                    entry: entry("b.py"),
                    content: FileContent::Omitted(OmittedReason::NotText),
                },
                ContextFile {
                    entry: entry("c.py"),
                    content: FileContent::Included("print('c')".to_string()),
                },
            ],
            additional_context: "internal tool".to_string(),
            token_estimate: 0,
        };

        let payload = ctx.render();
        let a = payload.find("=== a.py ===").expect("a header");
        let c = payload.find("=== c.py ===").expect("c header");
        assert!(a < c);
        assert!(!payload.contains("=== b.py ==="));
        assert!(payload.ends_with("Additional Context Provided by User:\ninternal tool"));
    }

    #[test]
    fn test_render_empty_context_has_placeholder() {
        let ctx = ProjectContext::default();
        assert_eq!(
            ctx.render(),
            "No readable file content found in the repository."
        );
    }
}
