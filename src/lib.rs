//! cryptstream - password-based file and directory encryption.
//!
//! A streaming, chunked AEAD container format for encrypting a single file
//! or an entire directory under a passphrase:
//! - Argon2id key derivation, split into an AEAD key and a whole-file MAC key
//! - XChaCha20-Poly1305 per-chunk authenticated encryption with fresh nonces
//! - a trailing HMAC-SHA256 over the entire artifact as defense in depth
//!   against reordering and truncation
//! - gzip + ZIP handled as an external archive façade so the streaming core
//!   only ever sees one finite byte stream

pub mod aead;
pub mod archive;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod kdf;
pub mod ops;
pub mod format;
pub mod progress;
pub mod secret;
pub mod stream;
pub mod ui;

pub use error::{CryptError, Result};
pub use format::Header;
pub use ops::{decrypt, decrypt_bytes, encrypt, encrypt_bytes, read_header, validate_kdf_params, DecryptOptions, DecryptOutcome, EncryptBytesOptions, EncryptOptions, EncryptOutcome};
