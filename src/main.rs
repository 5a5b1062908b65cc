//! cryptstream - a streaming, chunked AEAD file and directory encryption tool.
//!
//! Key derivation: Argon2id. Payload encryption: XChaCha20-Poly1305 per
//! chunk. Whole-file integrity: a trailing HMAC-SHA256. See the crate's
//! library documentation (`src/lib.rs`) for the container format.

use std::process::ExitCode;

use cryptstream::cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = cli::parse();
    match cli::run_command(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
