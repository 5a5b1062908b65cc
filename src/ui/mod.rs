//! Terminal-facing presentation: progress bars, password prompts, and the
//! plain status lines the CLI prints around each operation.

use std::path::Path;

use bytesize::ByteSize;

use crate::batch::{BatchSummary, ItemResult};

pub mod progress;
pub mod prompt;

/// Prints a one-line success summary after an encrypt/decrypt/read-header
/// run.
pub fn show_success(action: &str, path: &Path, bytes: u64) {
    println!("done: {action} {} ({})", path.display(), ByteSize(bytes));
}

/// Prints one line per batch item followed by an aggregate summary.
pub fn show_batch_results(results: &[ItemResult], summary: &BatchSummary) {
    for result in results {
        match &result.error {
            None => println!("  ok   {} -> {} ({:.2?})", result.input.display(), result.output.as_ref().expect("success carries an output path").display(), result.duration),
            Some(err) => println!("  fail {}: {err}", result.input.display()),
        }
    }
    println!("{} succeeded, {} failed, {} total", summary.succeeded, summary.failed, ByteSize(summary.total_bytes));
}
