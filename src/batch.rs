//! The batch driver: runs one core operation per path across many inputs,
//! sequentially, recording a per-item outcome instead of aborting the whole
//! run on the first failure. Takes an explicit input list; discovering what
//! paths to process is left to the caller.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::error::CryptError;
use crate::kdf::KdfParams;
use crate::ops::{self, DecryptOptions, EncryptOptions};

/// Which operation a [`BatchJob`] runs for every input path.
#[derive(Debug, Clone)]
pub enum BatchMode {
    Encrypt { output_dir: PathBuf, enable_gzip: bool, chunk_size: u32 },
    Decrypt { output_dir: PathBuf },
}

/// The outcome of running one item of a [`BatchJob`].
#[derive(Debug, Clone)]
pub struct ItemResult {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub bytes_written: u64,
    pub duration: Duration,
    pub error: Option<String>,
}

impl ItemResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A summary of a completed [`BatchJob::run`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub total_bytes: u64,
}

impl BatchSummary {
    fn from_results(results: &[ItemResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            if result.is_success() {
                summary.succeeded += 1;
                summary.total_bytes += result.bytes_written;
            } else {
                summary.failed += 1;
            }
        }
        summary
    }
}

/// Drives one operation (encrypt or decrypt) over an ordered list of input
/// paths, sequentially, continuing past per-item failures.
pub struct BatchJob {
    items: Vec<PathBuf>,
    mode: BatchMode,
    passphrase: Vec<u8>,
    kdf_params: KdfParams,
}

impl BatchJob {
    #[must_use]
    pub fn new(items: Vec<PathBuf>, mode: BatchMode, passphrase: Vec<u8>) -> Self {
        Self { items, mode, passphrase, kdf_params: KdfParams::default() }
    }

    #[must_use]
    pub fn with_kdf_params(mut self, kdf_params: KdfParams) -> Self {
        self.kdf_params = kdf_params;
        self
    }

    /// Runs every item in order, calling `on_item_progress(completed, total)`
    /// after each item finishes (success or failure). Returns one
    /// [`ItemResult`] per input, in input order.
    pub fn run(&self, mut on_item_progress: impl FnMut(usize, usize)) -> Vec<ItemResult> {
        let total = self.items.len();
        let mut results = Vec::with_capacity(total);

        for (index, input) in self.items.iter().enumerate() {
            let started = Instant::now();
            let result = self.run_one(input);
            let duration = started.elapsed();

            results.push(match result {
                Ok((output, bytes_written)) => ItemResult { input: input.clone(), output: Some(output), bytes_written, duration, error: None },
                Err(err) => {
                    warn!(input = %input.display(), error = %err, "batch item failed");
                    ItemResult { input: input.clone(), output: None, bytes_written: 0, duration, error: Some(err.to_string()) }
                }
            });

            on_item_progress(index + 1, total);
        }

        results
    }

    /// Runs [`run`] and folds the per-item results into a [`BatchSummary`].
    pub fn run_with_summary(&self, on_item_progress: impl FnMut(usize, usize)) -> (Vec<ItemResult>, BatchSummary) {
        let results = self.run(on_item_progress);
        let summary = BatchSummary::from_results(&results);
        (results, summary)
    }

    fn run_one(&self, input: &Path) -> Result<(PathBuf, u64), CryptError> {
        match &self.mode {
            BatchMode::Encrypt { output_dir, enable_gzip, chunk_size } => {
                std::fs::create_dir_all(output_dir).map_err(CryptError::Io)?;
                let output_path = output_dir.join(artifact_file_name(input));
                let options = EncryptOptions {
                    enable_gzip: *enable_gzip,
                    chunk_size: *chunk_size,
                    kdf_params: self.kdf_params,
                    ..EncryptOptions::default()
                };
                let outcome = ops::encrypt(input, &output_path, &self.passphrase, options)?;
                Ok((outcome.output_path, outcome.bytes_written))
            }
            BatchMode::Decrypt { output_dir } => {
                let options = DecryptOptions { kdf_params: self.kdf_params, ..DecryptOptions::default() };
                let outcome = ops::decrypt(input, output_dir, &self.passphrase, options)?;
                Ok((outcome.output_path, outcome.bytes_written))
            }
        }
    }
}

fn artifact_file_name(input: &Path) -> String {
    let stem = input.file_name().and_then(|n| n.to_str()).unwrap_or("artifact");
    format!("{stem}.{}", crate::config::ARTIFACT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn batch_encrypt_then_decrypt_roundtrips_all_items() {
        let src = tempdir().unwrap();
        let file_a = src.path().join("a.txt");
        let file_b = src.path().join("b.txt");
        fs::write(&file_a, b"alpha").unwrap();
        fs::write(&file_b, b"beta").unwrap();

        let encrypted_dir = src.path().join("encrypted");
        let encrypt_job = BatchJob::new(
            vec![file_a.clone(), file_b.clone()],
            BatchMode::Encrypt { output_dir: encrypted_dir.clone(), enable_gzip: true, chunk_size: crate::config::DEFAULT_CHUNK_SIZE },
            b"pw".to_vec(),
        );
        let (results, summary) = encrypt_job.run_with_summary(|_, _| {});
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 0);
        assert!(results.iter().all(ItemResult::is_success));

        let artifacts: Vec<_> = results.into_iter().map(|r| r.output.unwrap()).collect();
        let decrypted_dir = src.path().join("decrypted");
        fs::create_dir_all(&decrypted_dir).unwrap();
        let decrypt_job = BatchJob::new(artifacts, BatchMode::Decrypt { output_dir: decrypted_dir.clone() }, b"pw".to_vec());
        let (results, summary) = decrypt_job.run_with_summary(|_, _| {});
        assert_eq!(summary.succeeded, 2);

        assert_eq!(fs::read(decrypted_dir.join("a.txt")).unwrap(), b"alpha");
        assert_eq!(fs::read(decrypted_dir.join("b.txt")).unwrap(), b"beta");
    }

    #[test]
    fn batch_continues_past_a_failing_item() {
        let src = tempdir().unwrap();
        let good = src.path().join("good.txt");
        fs::write(&good, b"fine").unwrap();
        let missing = src.path().join("does-not-exist.txt");

        let output_dir = src.path().join("out");
        let job = BatchJob::new(
            vec![good.clone(), missing.clone()],
            BatchMode::Encrypt { output_dir, enable_gzip: false, chunk_size: crate::config::DEFAULT_CHUNK_SIZE },
            b"pw".to_vec(),
        );

        let (results, summary) = job.run_with_summary(|_, _| {});
        assert_eq!(results.len(), 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert!(results[0].is_success());
        assert!(!results[1].is_success());
        assert!(results[1].error.as_ref().unwrap().contains("does not exist") || results[1].error.is_some());
    }

    #[test]
    fn batch_progress_callback_is_invoked_per_item() {
        let src = tempdir().unwrap();
        let file = src.path().join("x.txt");
        fs::write(&file, b"x").unwrap();

        let job = BatchJob::new(
            vec![file],
            BatchMode::Encrypt { output_dir: src.path().join("out"), enable_gzip: true, chunk_size: crate::config::DEFAULT_CHUNK_SIZE },
            b"pw".to_vec(),
        );

        let mut calls = Vec::new();
        job.run(|completed, total| calls.push((completed, total)));
        assert_eq!(calls, vec![(1, 1)]);
    }
}
