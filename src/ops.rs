//! The crate's top-level operations: `encrypt`, `decrypt`, `read_header`,
//! and the small-buffer `encrypt_bytes`/`decrypt_bytes` variants. This is the
//! single place that wires key derivation, the container codec, the
//! streaming engine, and the archive façade together into one call per use
//! case.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::NamedTempFile;
use tracing::{info, instrument};

use crate::aead::{random_nonce, Aead20};
use crate::archive;
use crate::config::{DEFAULT_CHUNK_SIZE, MIN_ARTIFACT_LEN, SALT_LEN};
use crate::error::{CryptError, Result};
use crate::format::header::Header;
use crate::format::mac::StreamingMac;
use crate::kdf::{self, KdfParams};
use crate::progress::{noop, ProgressCallback};
use crate::stream;

/// Options accepted by [`encrypt`]. All fields have sensible defaults; a
/// caller typically starts from `EncryptOptions::default()` and overrides
/// only what it needs.
pub struct EncryptOptions<'a> {
    pub custom_uuid: Option<String>,
    pub enable_gzip: bool,
    pub chunk_size: u32,
    pub kdf_params: KdfParams,
    pub on_progress: Option<Box<ProgressCallback<'a>>>,
}

impl Default for EncryptOptions<'_> {
    fn default() -> Self {
        Self { custom_uuid: None, enable_gzip: true, chunk_size: DEFAULT_CHUNK_SIZE, kdf_params: KdfParams::default(), on_progress: None }
    }
}

/// Options accepted by [`decrypt`] and [`read_header`].
pub struct DecryptOptions<'a> {
    pub kdf_params: KdfParams,
    pub on_progress: Option<Box<ProgressCallback<'a>>>,
}

impl Default for DecryptOptions<'_> {
    fn default() -> Self {
        Self { kdf_params: KdfParams::default(), on_progress: None }
    }
}

/// Options accepted by [`encrypt_bytes`].
pub struct EncryptBytesOptions {
    pub custom_uuid: Option<String>,
    pub kdf_params: KdfParams,
}

impl Default for EncryptBytesOptions {
    fn default() -> Self {
        Self { custom_uuid: None, kdf_params: KdfParams::default() }
    }
}

/// The result of a successful [`encrypt`] call.
#[derive(Debug, Clone)]
pub struct EncryptOutcome {
    pub output_path: PathBuf,
    pub header: Header,
    pub bytes_written: u64,
}

/// The result of a successful [`decrypt`] call.
#[derive(Debug, Clone)]
pub struct DecryptOutcome {
    pub output_path: PathBuf,
    pub header: Header,
    pub bytes_written: u64,
}

/// Encrypts the file or directory at `input_path` into a single artifact at
/// `output_path`.
///
/// The artifact is written to a temp file beside `output_path` and persisted
/// only on success, so a caller never observes a partially written output.
///
/// # Errors
/// See [`CryptError`]; most commonly [`CryptError::InvalidInput`] for a
/// missing input path or empty passphrase, [`CryptError::Io`] for
/// filesystem failures.
#[instrument(skip(passphrase, options), fields(input = %input_path.display()))]
pub fn encrypt(input_path: &Path, output_path: &Path, passphrase: &[u8], options: EncryptOptions<'_>) -> Result<EncryptOutcome> {
    let start = Instant::now();
    if passphrase.is_empty() {
        return Err(CryptError::invalid_input("passphrase cannot be empty"));
    }

    let prepared = archive::prepare_encrypt(input_path, options.enable_gzip, options.custom_uuid)?;

    let output_dir = output_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(output_dir).map_err(CryptError::Io)?;
    let mut temp = NamedTempFile::new_in(output_dir).map_err(CryptError::Io)?;

    let on_progress = options.on_progress.unwrap_or_else(|| Box::new(noop));
    let outcome = stream::encrypt(
        prepared.file,
        prepared.len,
        temp.as_file_mut(),
        passphrase,
        prepared.header_input,
        options.chunk_size,
        options.kdf_params,
        on_progress,
    )?;

    temp.persist(output_path).map_err(|e| CryptError::Io(e.error))?;

    info!(elapsed_ms = start.elapsed().as_millis() as u64, bytes = outcome.bytes_written, "encrypt finished");
    Ok(EncryptOutcome { output_path: output_path.to_path_buf(), header: outcome.header, bytes_written: outcome.bytes_written })
}

/// Decrypts the artifact at `input_path`, restoring the original file or
/// directory under `output_dir`.
///
/// # Errors
/// [`CryptError::InvalidInput`] if `output_dir` does not exist;
/// [`CryptError::AuthFailure`] for a wrong passphrase or tampered artifact;
/// [`CryptError::Corrupt`] for a structurally broken artifact.
#[instrument(skip(passphrase, options), fields(input = %input_path.display()))]
pub fn decrypt(input_path: &Path, output_dir: &Path, passphrase: &[u8], options: DecryptOptions<'_>) -> Result<DecryptOutcome> {
    let start = Instant::now();
    if passphrase.is_empty() {
        return Err(CryptError::invalid_input("passphrase cannot be empty"));
    }
    if !output_dir.is_dir() {
        return Err(CryptError::invalid_input(format!("output directory does not exist: {}", output_dir.display())));
    }

    let artifact = File::open(input_path).map_err(CryptError::Io)?;
    check_min_artifact_len(&artifact)?;
    let mut payload_temp = NamedTempFile::new().map_err(CryptError::Io)?;

    let on_progress = options.on_progress.unwrap_or_else(|| Box::new(noop));
    let outcome = stream::decrypt(artifact, payload_temp.as_file_mut(), passphrase, options.kdf_params, on_progress)?;

    let payload_file = payload_temp.reopen().map_err(CryptError::Io)?;
    let output_path = archive::finalize_decrypt(&outcome.header, payload_file, output_dir)?;

    info!(elapsed_ms = start.elapsed().as_millis() as u64, bytes = outcome.bytes_written, "decrypt finished");
    Ok(DecryptOutcome { output_path, header: outcome.header, bytes_written: outcome.bytes_written })
}

/// Reads and AEAD-verifies only an artifact's header, without touching the
/// chunk stream or trailing MAC.
///
/// # Errors
/// Same failure modes as [`decrypt`], restricted to header parsing.
pub fn read_header(input_path: &Path, passphrase: &[u8], kdf_params: KdfParams) -> Result<Header> {
    if passphrase.is_empty() {
        return Err(CryptError::invalid_input("passphrase cannot be empty"));
    }
    let artifact = File::open(input_path).map_err(CryptError::Io)?;
    check_min_artifact_len(&artifact)?;
    stream::read_header(artifact, passphrase, kdf_params)
}

/// Rejects any artifact shorter than the minimum well-formed envelope
/// (every fixed-size framing field with a zero-length header and zero
/// chunks) before any parsing is attempted.
fn check_min_artifact_len(artifact: &File) -> Result<()> {
    let len = artifact.metadata().map_err(CryptError::Io)?.len();
    if len < MIN_ARTIFACT_LEN {
        return Err(CryptError::corrupt(format!("artifact is {len} bytes, shorter than the minimum of {MIN_ARTIFACT_LEN}")));
    }
    Ok(())
}

/// Validates a set of Argon2id parameters, mirroring [`kdf::validate_params`].
#[must_use]
pub fn validate_kdf_params(memory_kib: u32, parallelism: u32, iterations: u32) -> Vec<String> {
    kdf::validate_params(KdfParams { memory_kib, iterations, parallelism })
}

/// Encrypts an in-memory byte buffer without chunk framing.
///
/// This is a distinct on-disk variant from [`encrypt`]'s artifacts: it
/// shares magic, version, salt, and trailing HMAC, but the payload after the
/// header tag is a single AEAD-sealed blob rather than a chunk sequence.
/// Callers must not pass an `encrypt_bytes` artifact to [`decrypt`] or
/// vice versa.
///
/// # Errors
/// [`CryptError::InvalidInput`] for an empty passphrase.
pub fn encrypt_bytes(data: &[u8], passphrase: &[u8], options: EncryptBytesOptions) -> Result<Vec<u8>> {
    if passphrase.is_empty() {
        return Err(CryptError::invalid_input("passphrase cannot be empty"));
    }

    let mut salt = [0u8; SALT_LEN];
    rand::Rng::fill(&mut rand::rng(), &mut salt);
    let keys = kdf::derive(passphrase, &salt, options.kdf_params)?;
    let aead = Aead20::new(keys.aead_key.expose());
    let mut mac = StreamingMac::new(keys.mac_key.expose());

    let header = Header {
        uuid: options.custom_uuid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        original_name: String::new(),
        original_extension: String::new(),
        was_directory: false,
        is_compressed: false,
        original_size: i64::try_from(data.len()).map_err(|_| CryptError::invalid_input("data too large"))?,
        compressed_size: i64::try_from(data.len()).map_err(|_| CryptError::invalid_input("data too large"))?,
    };
    let header_plain = header.serialize()?;
    let header_nonce = random_nonce();
    let header_sealed = aead.seal(&header_nonce, &header_plain)?;
    let (header_ct, header_tag) = header_sealed.split_at(header_sealed.len() - 16);

    let payload_nonce = random_nonce();
    let payload_sealed = aead.seal(&payload_nonce, data)?;

    let mut out = Vec::with_capacity(64 + header_ct.len() + payload_sealed.len());
    let mut feed = |bytes: &[u8]| {
        out.extend_from_slice(bytes);
        mac.update(bytes);
    };

    feed(&crate::config::MAGIC);
    feed(&[crate::config::CURRENT_VERSION]);
    feed(&salt);
    feed(&header_nonce);
    feed(&(header_ct.len() as u32).to_be_bytes());
    feed(header_ct);
    feed(header_tag);
    feed(&payload_nonce);
    feed(&payload_sealed);

    let digest = mac.finalize();
    out.extend_from_slice(&digest);

    Ok(out)
}

/// Decrypts a buffer produced by [`encrypt_bytes`].
///
/// # Errors
/// [`CryptError::AuthFailure`] for a wrong passphrase or tampered buffer;
/// [`CryptError::Corrupt`] for a structurally broken buffer.
pub fn decrypt_bytes(artifact: &[u8], passphrase: &[u8], kdf_params: KdfParams) -> Result<Vec<u8>> {
    use byteorder::{BigEndian, ReadBytesExt};
    use std::io::{Cursor, Read};

    if passphrase.is_empty() {
        return Err(CryptError::invalid_input("passphrase cannot be empty"));
    }
    if (artifact.len() as u64) < MIN_ARTIFACT_LEN {
        return Err(CryptError::corrupt(format!("artifact is {} bytes, shorter than the minimum of {MIN_ARTIFACT_LEN}", artifact.len())));
    }

    let mut cursor = Cursor::new(artifact);
    let mut magic = [0u8; 4];
    cursor.read_exact(&mut magic).map_err(|_| CryptError::corrupt("truncated before magic"))?;
    if magic != crate::config::MAGIC {
        return Err(CryptError::corrupt("bad magic bytes"));
    }

    let mut version = [0u8; 1];
    cursor.read_exact(&mut version).map_err(|_| CryptError::corrupt("truncated before version"))?;
    if version[0] != crate::config::CURRENT_VERSION {
        return Err(CryptError::corrupt(format!("unsupported version {}", version[0])));
    }

    let mut salt = [0u8; SALT_LEN];
    cursor.read_exact(&mut salt).map_err(|_| CryptError::corrupt("truncated before salt"))?;

    let keys = kdf::derive(passphrase, &salt, kdf_params)?;
    let aead = Aead20::new(keys.aead_key.expose());
    let mut mac = StreamingMac::new(keys.mac_key.expose());
    mac.update(&magic);
    mac.update(&version);
    mac.update(&salt);

    let mut header_nonce = [0u8; 24];
    cursor.read_exact(&mut header_nonce).map_err(|_| CryptError::corrupt("truncated before header nonce"))?;
    mac.update(&header_nonce);

    let header_len = cursor.read_u32::<BigEndian>().map_err(|_| CryptError::corrupt("truncated before header length"))?;
    if header_len > crate::config::MAX_HEADER_LEN {
        return Err(CryptError::corrupt("header length exceeds limit"));
    }
    mac.update(&header_len.to_be_bytes());

    let mut header_ct = vec![0u8; header_len as usize];
    cursor.read_exact(&mut header_ct).map_err(|_| CryptError::corrupt("truncated encrypted header"))?;
    mac.update(&header_ct);

    let mut header_tag = [0u8; 16];
    cursor.read_exact(&mut header_tag).map_err(|_| CryptError::corrupt("truncated header tag"))?;
    mac.update(&header_tag);

    let mut header_sealed = header_ct;
    header_sealed.extend_from_slice(&header_tag);
    let header_plain = aead.open(&header_nonce, &header_sealed)?;
    let header = Header::deserialize(&header_plain)?;

    let mut payload_nonce = [0u8; 24];
    cursor.read_exact(&mut payload_nonce).map_err(|_| CryptError::corrupt("truncated before payload nonce"))?;
    mac.update(&payload_nonce);

    let payload_len = usize::try_from(header.compressed_size).map_err(|_| CryptError::corrupt("negative compressed_size"))?;
    let mut payload_sealed = vec![0u8; payload_len + 16];
    cursor.read_exact(&mut payload_sealed).map_err(|_| CryptError::corrupt("truncated payload"))?;
    mac.update(&payload_sealed);

    let plaintext = aead.open(&payload_nonce, &payload_sealed)?;

    let mut stored_mac = [0u8; 32];
    cursor.read_exact(&mut stored_mac).map_err(|_| CryptError::corrupt("truncated trailing MAC"))?;
    mac.finalize_and_verify(&stored_mac)?;

    Ok(plaintext)
}
