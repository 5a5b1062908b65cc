//! The streaming engine: bounded-memory, strictly sequential chunked
//! encryption and decryption over the container format.

pub mod engine;
pub mod reader;
pub mod writer;

pub use engine::{decrypt, encrypt, read_header, DecryptOutcome, EncryptOutcome, HeaderInput};
