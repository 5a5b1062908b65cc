//! Cryptographic and format constants.
//!
//! This module defines the core constants used throughout the crate: the
//! on-disk container format's fixed sizes, Argon2id defaults, and other
//! tunables. These constants are the single source of truth for the
//! container format described in the crate's design notes.

/// Magic bytes identifying a cryptstream artifact: `"AENC"`.
pub const MAGIC: [u8; 4] = *b"AENC";

/// The current (and only) supported container format version.
pub const CURRENT_VERSION: u8 = 0x01;

/// Length of the per-artifact salt, in bytes.
pub const SALT_LEN: usize = 16;

/// Length of an XChaCha20-Poly1305 nonce, in bytes.
pub const NONCE_LEN: usize = 24;

/// Length of an XChaCha20-Poly1305 authentication tag, in bytes.
pub const TAG_LEN: usize = 16;

/// Length of the AEAD key, in bytes.
pub const AEAD_KEY_LEN: usize = 32;

/// Length of the whole-file HMAC-SHA256 key, in bytes.
pub const MAC_KEY_LEN: usize = 32;

/// Combined length of the Argon2id output that is split into the AEAD and
/// MAC keys (`AEAD_KEY_LEN + MAC_KEY_LEN`).
pub const DERIVED_KEY_LEN: usize = AEAD_KEY_LEN + MAC_KEY_LEN;

/// Length of the trailing whole-file HMAC-SHA256 digest, in bytes.
pub const MAC_LEN: usize = 32;

/// Hard upper bound on the encrypted-header length field.
///
/// Any artifact that declares a header longer than this is rejected as
/// `Corrupt` before any allocation is made on the caller's behalf.
pub const MAX_HEADER_LEN: u32 = 10_000;

/// Default chunk size used by the streaming engine: 1 MiB.
pub const DEFAULT_CHUNK_SIZE: u32 = 1024 * 1024;

/// Argon2id memory cost, in KiB. OWASP-recommended default for Argon2id.
pub const ARGON2_MEMORY_KIB: u32 = 19_456;

/// Argon2id parallelism (lanes).
pub const ARGON2_PARALLELISM: u32 = 1;

/// Argon2id time cost (iterations).
pub const ARGON2_ITERATIONS: u32 = 2;

/// Argon2id output length, in bytes (split into the AEAD and MAC keys).
pub const ARGON2_OUTPUT_LEN: usize = DERIVED_KEY_LEN;

/// Minimum Argon2id memory cost accepted by [`crate::kdf::validate_params`].
pub const ARGON2_MIN_MEMORY_KIB: u32 = 8;

/// Minimum Argon2id parallelism accepted by [`crate::kdf::validate_params`].
pub const ARGON2_MIN_PARALLELISM: u32 = 1;

/// Minimum Argon2id iteration count accepted by [`crate::kdf::validate_params`].
pub const ARGON2_MIN_ITERATIONS: u32 = 1;

/// Below this memory cost combined with fewer than 3 iterations, parameters
/// are weaker than OWASP guidance (still accepted, but flagged).
pub const OWASP_MIN_MEMORY_KIB: u32 = 19_456;

/// Iteration count under which [`ARGON2_MEMORY_KIB`] weakness is flagged.
pub const OWASP_MIN_ITERATIONS_FOR_LOW_MEMORY: u32 = 3;

/// Maximum length of the `uuid` header field, in bytes.
pub const MAX_UUID_LEN: usize = 255;

/// Maximum length of the `original_name` header field, in bytes.
pub const MAX_NAME_LEN: usize = 65_535;

/// Maximum length of the `original_extension` header field, in bytes.
pub const MAX_EXTENSION_LEN: usize = 255;

/// Minimum size of a well-formed artifact: every fixed-size framing field
/// with a zero-length header and zero chunks.
///
/// `magic(4) + version(1) + salt(16) + header_nonce(24) + header_len(4) +
/// header_tag(16) + chunk_size(4) + chunk_count(8) + trailing_mac(32)`
pub const MIN_ARTIFACT_LEN: u64 = 4 + 1 + SALT_LEN as u64 + NONCE_LEN as u64 + 4 + TAG_LEN as u64 + 4 + 8 + MAC_LEN as u64;

/// The suggested output file extension for artifacts produced by this crate.
pub const ARTIFACT_EXTENSION: &str = "cstream";

/// Minimum required password length enforced by the interactive prompt.
///
/// This is a usability nicety, not a format invariant: the container format
/// itself only requires a nonempty passphrase.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Size of the read/write buffer used when copying archive temp files, in
/// bytes.
pub const IO_BUFFER_SIZE: usize = 64 * 1024;

/// Patterns excluded when walking a directory to build a ZIP archive.
///
/// Mirrors common "don't archive your own tooling" exclusions: VCS
/// directories, build artifacts, and editor/OS caches.
pub const EXCLUDED_PATTERNS: &[&str] = &["target", "node_modules", ".git", ".hg", ".svn", ".DS_Store"];
