//! Context assembly: reads filtered files and builds the bounded payload.
//!
//! Reads are issued concurrently for I/O throughput, then re-sorted into
//! the canonical lexicographic order before the payload is built, so the
//! result is independent of read completion order.

use crate::context::{ContextFile, FileContent, OmittedReason, ProjectContext};
use crate::error::{Error, Result};
use crate::filter::FileEntry;
use crate::log_warn;
use crate::token_optimizer::TokenOptimizer;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

/// Per-file content cap in bytes. Chosen generously so a single generated
/// or vendored file cannot starve the token budget before prioritization
/// runs. Not user-tunable.
pub const MAX_FILE_BYTES: usize = 100 * 1024;

/// Number of file reads in flight at once.
const READ_CONCURRENCY: usize = 16;

/// Read the given files and build a [`ProjectContext`] bounded by
/// `max_tokens`.
///
/// Files that cannot be read or decoded are marked omitted with a reason
/// rather than failing the run. Cancellation interrupts in-flight reads
/// and surfaces [`Error::Cancelled`] instead of a partial context.
pub async fn assemble(
    files: Vec<FileEntry>,
    additional_context: String,
    max_tokens: usize,
    cancel: &CancellationToken,
) -> Result<ProjectContext> {
    let optimizer = TokenOptimizer::new(max_tokens)?;

    let reads = futures::stream::iter(files)
        .map(|entry| async move {
            let content = read_bounded(&entry).await;
            ContextFile { entry, content }
        })
        .buffer_unordered(READ_CONCURRENCY)
        .collect::<Vec<_>>();

    let mut context_files = tokio::select! {
        biased;
        () = cancel.cancelled() => return Err(Error::Cancelled),
        files = reads => files,
    };
    // Canonical order regardless of read completion order.
    context_files.sort_by(|a, b| a.entry.relative_path.cmp(&b.entry.relative_path));

    let mut context = ProjectContext {
        files: context_files,
        additional_context,
        token_estimate: 0,
    };
    optimizer.optimize_context(&mut context);
    Ok(context)
}

/// Read one file, capped at [`MAX_FILE_BYTES`], decoded as UTF-8.
async fn read_bounded(entry: &FileEntry) -> FileContent {
    let bytes = match tokio::fs::read(&entry.path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log_warn!("Could not read {}: {}", entry.relative_path, e);
            return FileContent::Omitted(OmittedReason::Unreadable(e.to_string()));
        }
    };

    let Ok(mut text) = String::from_utf8(bytes) else {
        log_warn!(
            "Could not decode {} as UTF-8, omitting",
            entry.relative_path
        );
        return FileContent::Omitted(OmittedReason::NotText);
    };

    if text.len() > MAX_FILE_BYTES {
        let mut cut = MAX_FILE_BYTES;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    FileContent::Included(text)
}
