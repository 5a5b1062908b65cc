//! Progress bar rendering for the CLI, wrapping `indicatif` around the
//! core's byte-counting [`crate::progress::ProgressCallback`].
//!
//! The core only ever reports absolute `(processed, total)` pairs rather
//! than deltas, so this wrapper sets the bar's length lazily from the first
//! callback instead of requiring a caller to know the total up front.

use indicatif::{ProgressBar as Bar, ProgressStyle as Style};

use crate::progress::ProgressCallback;

const TEMPLATE: &str = "{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// A styled, terminal-safe progress bar for one encrypt/decrypt operation.
pub struct ProgressBar {
    bar: Bar,
}

impl ProgressBar {
    /// Creates a bar with `description` as its message; its length is set on
    /// the first progress callback invocation.
    pub fn new(description: &str) -> Self {
        let bar = Bar::new(0);
        bar.set_style(Style::with_template(TEMPLATE).expect("progress template is valid").progress_chars("●○ "));
        bar.set_message(description.to_owned());
        Self { bar }
    }

    /// Builds the `(processed, total)` callback the streaming engine expects.
    /// The returned closure owns a clone of the underlying bar handle (cheap:
    /// `indicatif::ProgressBar` is `Arc`-backed), so it can be moved into an
    /// [`crate::ops::EncryptOptions`]/[`crate::ops::DecryptOptions`]
    /// independently of `self`.
    pub fn callback(&self) -> Box<ProgressCallback<'static>> {
        let bar = self.bar.clone();
        Box::new(move |processed, total| {
            if bar.length() != Some(total) {
                bar.set_length(total);
            }
            bar.set_position(processed);
        })
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_with_message("done");
        }
    }
}
