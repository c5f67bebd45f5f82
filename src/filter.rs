//! File traversal and filtering.
//!
//! Walks a project directory and decides which files may enter the
//! generation context. Directories named in the ignore set are pruned so
//! their subtrees are never visited, which matters for large dependency
//! trees like `node_modules` or `target`. Output ordering is lexicographic
//! by relative path so the result is independent of filesystem ordering.

use crate::error::{Error, Result};
use crate::log_warn;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names that are always pruned, in addition to user-supplied ones.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "venv",
    ".venv",
    "__pycache__",
    "dist",
    "build",
    ".idea",
    ".vscode",
];

/// File patterns that are always excluded, in addition to user-supplied ones.
/// A pattern is either an exact file name or a glob where `*` matches any
/// run of characters and `?` matches a single character.
pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "Cargo.lock",
    "poetry.lock",
    ".DS_Store",
    "*.md",
    "*.lock",
    "*.min.js",
    "*.map",
    "*.pyc",
    "*.log",
];

/// A file selected by traversal. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path on disk.
    pub path: PathBuf,
    /// Path relative to the scanned root, with `/` separators.
    pub relative_path: String,
    /// File extension without the leading dot, if any.
    pub extension: Option<String>,
    /// Size in bytes as reported by the filesystem.
    pub size: u64,
}

/// Ignore/allow rules governing which files enter the context.
#[derive(Debug, Clone, Default)]
pub struct FilterRules {
    /// Directory names to prune (unioned with [`DEFAULT_IGNORE_DIRS`]).
    pub ignore_dirs: Vec<String>,
    /// File name patterns to exclude (unioned with [`DEFAULT_IGNORE_FILES`]).
    pub ignore_files: Vec<String>,
    /// Extensions to exclude. Mutually exclusive with `allow_extensions`.
    pub ignore_extensions: Option<Vec<String>>,
    /// Extensions that fully determine inclusion when present.
    pub allow_extensions: Option<Vec<String>>,
}

impl FilterRules {
    /// Validate rule invariants. Called before traversal; a violation is a
    /// configuration error, never a partial scan.
    pub fn validate(&self) -> Result<()> {
        if self.ignore_extensions.is_some() && self.allow_extensions.is_some() {
            return Err(Error::Configuration(
                "--ignore-extensions and --allow-extensions are mutually exclusive".to_string(),
            ));
        }
        let lists: [(&str, Option<&Vec<String>>); 2] = [
            ("--ignore-extensions", self.ignore_extensions.as_ref()),
            ("--allow-extensions", self.allow_extensions.as_ref()),
        ];
        for (flag, list) in lists {
            if let Some(values) = list
                && values.is_empty()
            {
                return Err(Error::Configuration(format!("{flag} must not be empty")));
            }
        }
        if self.ignore_dirs.iter().any(String::is_empty)
            || self.ignore_files.iter().any(String::is_empty)
        {
            return Err(Error::Configuration(
                "ignore lists must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }
}

/// Match a file name against an exact-or-glob pattern.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one. Patterns without wildcards are exact name comparisons.
pub fn pattern_matches(pattern: &str, name: &str) -> bool {
    if !pattern.contains('*') && !pattern.contains('?') {
        return pattern == name;
    }
    glob_match(pattern.as_bytes(), name.as_bytes())
}

fn glob_match(pattern: &[u8], name: &[u8]) -> bool {
    match (pattern.first(), name.first()) {
        (None, None) => true,
        (Some(b'*'), _) => {
            glob_match(&pattern[1..], name)
                || (!name.is_empty() && glob_match(pattern, &name[1..]))
        }
        (Some(b'?'), Some(_)) => glob_match(&pattern[1..], &name[1..]),
        (Some(p), Some(n)) if p == n => glob_match(&pattern[1..], &name[1..]),
        _ => false,
    }
}

/// Walk `root` and return the files that pass the filter rules, sorted
/// lexicographically by relative path.
///
/// Fails with a filesystem error if `root` does not exist, is not a
/// directory, or cannot be read. Individually unreadable entries deeper in
/// the tree are skipped with a warning.
pub fn scan_project(root: &Path, rules: &FilterRules) -> Result<Vec<FileEntry>> {
    rules.validate()?;

    let metadata = fs::metadata(root).map_err(|source| Error::Filesystem {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::Filesystem {
            path: root.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotADirectory,
                "root path is not a directory",
            ),
        });
    }
    // Surface a permission error on the root itself before walking; an
    // unreadable root is fatal, unlike unreadable entries inside the tree.
    fs::read_dir(root).map_err(|source| Error::Filesystem {
        path: root.to_path_buf(),
        source,
    })?;

    let ignore_dirs: HashSet<&str> = DEFAULT_IGNORE_DIRS
        .iter()
        .copied()
        .chain(rules.ignore_dirs.iter().map(String::as_str))
        .collect();
    let ignore_files: Vec<&str> = DEFAULT_IGNORE_FILES
        .iter()
        .copied()
        .chain(rules.ignore_files.iter().map(String::as_str))
        .collect();

    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.') && !ignore_dirs.contains(name.as_ref())
        });

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(e) => {
                log_warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        if ignore_files.iter().any(|p| pattern_matches(p, &name)) {
            continue;
        }

        let extension = entry
            .path()
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());
        if let Some(allowed) = &rules.allow_extensions {
            // Allow mode: membership fully determines inclusion and the
            // ignore-extension list is not consulted.
            match &extension {
                Some(ext) if allowed.iter().any(|a| a == ext) => {}
                _ => continue,
            }
        } else if let Some(ignored) = &rules.ignore_extensions
            && let Some(ext) = &extension
            && ignored.iter().any(|i| i == ext)
        {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log_warn!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let relative_path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        entries.push(FileEntry {
            path: entry.path().to_path_buf(),
            relative_path,
            extension,
            size: metadata.len(),
        });
    }

    entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(entries)
}
