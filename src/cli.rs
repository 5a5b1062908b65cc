//! CLI commands and argument parsing.
//!
//! Five subcommands over the core: `encrypt`, `decrypt`, `read-header`,
//! `validate-params`, and `batch`. Every password-accepting subcommand
//! prompts interactively (hidden input) when `--password` is omitted.
//! Encryption/decryption run on a blocking worker thread
//! (`tokio::task::spawn_blocking`) since the KDF and chunk
//! pipeline are intentionally CPU-heavy and must not run on an async
//! executor's poll loop.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::batch::{BatchJob, BatchMode};
use crate::config::{ARTIFACT_EXTENSION, DEFAULT_CHUNK_SIZE, PASSWORD_MIN_LENGTH};
use crate::kdf::KdfParams;
use crate::ops::{self, DecryptOptions, EncryptOptions};
use crate::ui;
use crate::ui::progress::ProgressBar;
use crate::ui::prompt::Prompt;

/// cryptstream - password-based file and directory encryption.
#[derive(Parser)]
#[command(name = "cryptstream")]
#[command(version)]
#[command(about = "Encrypt and decrypt files or directories with a streaming, chunked AEAD container format.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt a file or directory into a single artifact.
    Encrypt {
        /// Input file or directory path.
        #[arg(short, long)]
        input: PathBuf,

        /// Output artifact path (defaults to `<input>.cstream`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Password for encryption (prompted if omitted).
        #[arg(short, long)]
        password: Option<String>,

        /// Chunk size in bytes (defaults to 1 MiB).
        #[arg(long)]
        chunk_size: Option<u32>,

        /// Disable gzip compression of the payload.
        #[arg(long)]
        no_gzip: bool,

        /// Use a caller-supplied UUID instead of generating one.
        #[arg(long)]
        uuid: Option<String>,
    },

    /// Decrypt an artifact, restoring the original file or directory.
    Decrypt {
        /// Input artifact path.
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the restored file/directory is created inside. Must
        /// already exist.
        #[arg(short = 'd', long)]
        output_dir: PathBuf,

        /// Password for decryption (prompted if omitted).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Print an artifact's header without touching its chunk stream.
    ReadHeader {
        /// Input artifact path.
        #[arg(short, long)]
        input: PathBuf,

        /// Password (prompted if omitted).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Validate a set of Argon2id parameters without deriving any key.
    ValidateParams {
        /// Memory cost, in KiB.
        #[arg(long, default_value_t = crate::config::ARGON2_MEMORY_KIB)]
        memory: u32,

        /// Parallelism (lanes).
        #[arg(long, default_value_t = crate::config::ARGON2_PARALLELISM)]
        parallelism: u32,

        /// Iteration count.
        #[arg(long, default_value_t = crate::config::ARGON2_ITERATIONS)]
        iterations: u32,
    },

    /// Encrypt or decrypt many paths in one run, sequentially.
    Batch {
        /// Input paths (files and/or directories).
        #[arg(long, num_args = 1.., required = true)]
        inputs: Vec<PathBuf>,

        /// Directory artifacts/restored content are written into.
        #[arg(short = 'd', long)]
        output_dir: PathBuf,

        /// Encrypt every input instead of decrypting it.
        #[arg(long, conflicts_with = "decrypt")]
        encrypt: bool,

        /// Decrypt every input instead of encrypting it.
        #[arg(long, conflicts_with = "encrypt")]
        decrypt: bool,

        /// Password (prompted if omitted).
        #[arg(short, long)]
        password: Option<String>,

        /// Disable gzip compression (encrypt mode only).
        #[arg(long)]
        no_gzip: bool,

        /// Chunk size in bytes (encrypt mode only).
        #[arg(long)]
        chunk_size: Option<u32>,
    },
}

/// Parses CLI arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Runs a CLI command to completion, printing its result to stdout.
///
/// # Errors
/// Any failure surfaced by the core is wrapped with context identifying the
/// command and input path; the binary converts this into a nonzero exit
/// code.
pub async fn run_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Encrypt { input, output, password, chunk_size, no_gzip, uuid } => run_encrypt(input, output, password, chunk_size, no_gzip, uuid).await,
        Commands::Decrypt { input, output_dir, password } => run_decrypt(input, output_dir, password).await,
        Commands::ReadHeader { input, password } => run_read_header(input, password).await,
        Commands::ValidateParams { memory, parallelism, iterations } => run_validate_params(memory, parallelism, iterations),
        Commands::Batch { inputs, output_dir, encrypt, decrypt, password, no_gzip, chunk_size } => run_batch(inputs, output_dir, encrypt, decrypt, password, no_gzip, chunk_size).await,
    }
}

fn resolve_password(supplied: Option<String>, confirm: bool) -> Result<String> {
    if let Some(password) = supplied {
        return Ok(password);
    }
    let prompt = Prompt::new(PASSWORD_MIN_LENGTH);
    let password = if confirm { prompt.prompt_encryption_password() } else { prompt.prompt_decryption_password() };
    password.context("reading password from terminal")
}

fn default_output_path(input: &std::path::Path) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "artifact".to_owned());
    input.with_file_name(format!("{name}.{ARTIFACT_EXTENSION}"))
}

async fn run_encrypt(input: PathBuf, output: Option<PathBuf>, password: Option<String>, chunk_size: Option<u32>, no_gzip: bool, uuid: Option<String>) -> Result<()> {
    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let password = resolve_password(password, true)?;

    let bar = ProgressBar::new("encrypting");
    let options = EncryptOptions {
        custom_uuid: uuid,
        enable_gzip: !no_gzip,
        chunk_size: chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE),
        kdf_params: KdfParams::default(),
        on_progress: Some(bar.callback()),
    };

    let outcome = tokio::task::spawn_blocking(move || ops::encrypt(&input, &output_path, password.as_bytes(), options))
        .await
        .context("encryption worker panicked")?
        .context("encryption failed")?;
    bar.finish();

    ui::show_success("encrypted", &outcome.output_path, outcome.bytes_written);
    info!(uuid = %outcome.header.uuid, "encrypt command finished");
    Ok(())
}

async fn run_decrypt(input: PathBuf, output_dir: PathBuf, password: Option<String>) -> Result<()> {
    if !output_dir.is_dir() {
        bail!("output directory does not exist: {}", output_dir.display());
    }
    let password = resolve_password(password, false)?;

    let bar = ProgressBar::new("decrypting");
    let options = DecryptOptions { kdf_params: KdfParams::default(), on_progress: Some(bar.callback()) };

    let outcome = tokio::task::spawn_blocking(move || ops::decrypt(&input, &output_dir, password.as_bytes(), options))
        .await
        .context("decryption worker panicked")?
        .context("decryption failed")?;
    bar.finish();

    ui::show_success("decrypted", &outcome.output_path, outcome.bytes_written);
    Ok(())
}

async fn run_read_header(input: PathBuf, password: Option<String>) -> Result<()> {
    let password = resolve_password(password, false)?;

    let header = tokio::task::spawn_blocking(move || ops::read_header(&input, password.as_bytes(), KdfParams::default()))
        .await
        .context("read-header worker panicked")?
        .context("reading header failed")?;

    println!("uuid:                {}", header.uuid);
    println!("original_name:       {}", header.original_name);
    println!("original_extension:  {}", header.original_extension);
    println!("was_directory:       {}", header.was_directory);
    println!("is_compressed:       {}", header.is_compressed);
    println!("original_size:       {}", header.original_size);
    println!("compressed_size:     {}", header.compressed_size);
    Ok(())
}

fn run_validate_params(memory: u32, parallelism: u32, iterations: u32) -> Result<()> {
    let warnings = ops::validate_kdf_params(memory, parallelism, iterations);
    if warnings.is_empty() {
        println!("parameters meet OWASP-recommended Argon2id defaults");
    } else {
        for warning in &warnings {
            println!("warning: {warning}");
        }
    }
    Ok(())
}

async fn run_batch(inputs: Vec<PathBuf>, output_dir: PathBuf, encrypt: bool, decrypt: bool, password: Option<String>, no_gzip: bool, chunk_size: Option<u32>) -> Result<()> {
    if encrypt == decrypt {
        bail!("exactly one of --encrypt or --decrypt must be given");
    }
    let password = resolve_password(password, encrypt)?;

    let mode = if encrypt {
        BatchMode::Encrypt { output_dir, enable_gzip: !no_gzip, chunk_size: chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE) }
    } else {
        BatchMode::Decrypt { output_dir }
    };

    let job = BatchJob::new(inputs, mode, password.into_bytes());
    let (results, summary) = tokio::task::spawn_blocking(move || job.run_with_summary(|_, _| {})).await.context("batch worker panicked")?;

    ui::show_batch_results(&results, &summary);
    if summary.failed > 0 {
        bail!("{} of {} batch item(s) failed", summary.failed, summary.failed + summary.succeeded);
    }
    Ok(())
}
