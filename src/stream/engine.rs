//! The streaming engine: drives the container format's byte-exact layout
//! over a bounded-memory, strictly sequential chunk pipeline.
//!
//! Chunk `i + 1` is never started before chunk `i`'s ciphertext (or
//! plaintext) has been written and fed to the running whole-file MAC,
//! because the trailing HMAC must observe every byte in exact artifact
//! order.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::aead::{Aead20, random_nonce};
use crate::config::{CURRENT_VERSION, MAC_LEN, MAGIC, MAX_HEADER_LEN, NONCE_LEN, SALT_LEN, TAG_LEN};
use crate::error::{CryptError, Result};
use crate::format::header::Header;
use crate::format::mac::StreamingMac;
use crate::kdf::{self, KdfParams};
use crate::progress::ProgressCallback;
use crate::stream::reader::ChunkReader;
use crate::stream::writer::MacWriter;

/// The fields an artifact's header carries, supplied by the archive façade.
#[derive(Debug, Clone)]
pub struct HeaderInput {
    pub uuid: String,
    pub original_name: String,
    pub original_extension: String,
    pub was_directory: bool,
    pub is_compressed: bool,
    pub original_size: i64,
}

/// The result of a successful streaming encryption.
#[derive(Debug, Clone)]
pub struct EncryptOutcome {
    pub header: Header,
    pub bytes_written: u64,
}

/// The result of a successful streaming decryption.
#[derive(Debug, Clone)]
pub struct DecryptOutcome {
    pub header: Header,
    pub bytes_written: u64,
}

/// Encrypts `payload` (exactly `payload_len` bytes) into `output`, producing
/// one complete artifact per the container format.
///
/// # Errors
/// [`CryptError::InvalidInput`] for a malformed passphrase/header field;
/// [`CryptError::Io`] for any underlying I/O failure.
pub fn encrypt<R: Read, W: Write>(
    mut payload: R,
    payload_len: u64,
    mut output: W,
    passphrase: &[u8],
    header_input: HeaderInput,
    chunk_size: u32,
    params: KdfParams,
    mut on_progress: Box<ProgressCallback>,
) -> Result<EncryptOutcome> {
    if chunk_size == 0 {
        return Err(CryptError::invalid_input("chunk_size must be positive"));
    }

    let mut salt = [0u8; SALT_LEN];
    rand::Rng::fill(&mut rand::rng(), &mut salt);
    let keys = kdf::derive(passphrase, &salt, params)?;

    let mac = StreamingMac::new(keys.mac_key.expose());
    let aead = Aead20::new(keys.aead_key.expose());
    let mut writer = MacWriter::new(&mut output, mac);

    let header = Header {
        uuid: header_input.uuid,
        original_name: header_input.original_name,
        original_extension: header_input.original_extension,
        was_directory: header_input.was_directory,
        is_compressed: header_input.is_compressed,
        original_size: header_input.original_size,
        compressed_size: i64::try_from(payload_len).map_err(|_| CryptError::invalid_input("payload too large"))?,
    };
    let header_plain = header.serialize()?;

    let header_nonce = random_nonce();
    let header_ciphertext = aead.seal(&header_nonce, &header_plain)?;
    let (header_ct, header_tag) = header_ciphertext.split_at(header_ciphertext.len() - TAG_LEN);
    if header_ct.len() as u64 > u64::from(MAX_HEADER_LEN) {
        return Err(CryptError::invalid_input(format!(
            "serialized header is {} bytes, exceeds the {MAX_HEADER_LEN}-byte limit",
            header_ct.len()
        )));
    }

    writer.write_all(&MAGIC)?;
    writer.write_all(&[CURRENT_VERSION])?;
    writer.write_all(&salt)?;
    writer.write_all(&header_nonce)?;
    writer.write_all(&u32_be(header_ct.len() as u32))?;
    writer.write_all(header_ct)?;
    writer.write_all(header_tag)?;
    writer.write_all(&u32_be(chunk_size))?;

    let chunk_count = if payload_len == 0 { 0 } else { payload_len.div_ceil(u64::from(chunk_size)) };
    writer.write_all(&i64_be(i64::try_from(chunk_count).map_err(|_| CryptError::internal("chunk count overflow"))?))?;

    let mut reader = ChunkReader::new(&mut payload, chunk_size as usize);
    let mut processed: u64 = 0;
    on_progress(processed, payload_len);

    loop {
        let chunk = reader.read_chunk()?;
        if chunk.is_empty() {
            break;
        }

        let nonce = random_nonce();
        let sealed = aead.seal(&nonce, &chunk)?;

        writer.write_all(&nonce)?;
        writer.write_all(&sealed)?;

        processed += chunk.len() as u64;
        on_progress(processed, payload_len);

        if chunk.len() < chunk_size as usize {
            break;
        }
    }

    writer.flush()?;
    let (mut output, mac) = writer.into_parts();
    let digest = mac.finalize();
    output.write_all(&digest)?;
    output.flush()?;

    let bytes_written = processed;
    Ok(EncryptOutcome { header, bytes_written })
}

/// Decrypts an artifact produced by [`encrypt`], writing the recovered
/// payload to `output` and returning the parsed header.
///
/// # Errors
/// [`CryptError::Corrupt`] for a structurally broken artifact,
/// [`CryptError::AuthFailure`] for a wrong passphrase or any tampered byte.
pub fn decrypt<R: Read, W: Write>(
    mut artifact: R,
    mut output: W,
    passphrase: &[u8],
    params: KdfParams,
    mut on_progress: Box<ProgressCallback>,
) -> Result<DecryptOutcome> {
    let (header, mut mac, aead) = read_header_prelude(&mut artifact, passphrase, params)?;
    let (chunk_size, chunk_count) = read_chunk_framing(&mut artifact, &mut mac, &header)?;

    let expected_total = u64::try_from(header.compressed_size).map_err(|_| CryptError::corrupt("negative compressed_size"))?;
    let mut processed: u64 = 0;
    on_progress(processed, expected_total);

    for i in 0..chunk_count {
        let is_last = i == chunk_count - 1;
        let expected_len = if is_last {
            let rem = expected_total % u64::from(chunk_size);
            if rem == 0 { chunk_size as u64 } else { rem }
        } else {
            u64::from(chunk_size)
        };

        let mut nonce = [0u8; NONCE_LEN];
        artifact.read_exact(&mut nonce).map_err(|_| CryptError::corrupt("truncated chunk nonce"))?;
        mac.update(&nonce);

        let mut ciphertext = vec![0u8; expected_len as usize + TAG_LEN];
        artifact.read_exact(&mut ciphertext).map_err(|_| CryptError::corrupt("truncated chunk body"))?;
        mac.update(&ciphertext);

        let plaintext = aead.open(&nonce, &ciphertext)?;
        output.write_all(&plaintext).map_err(CryptError::Io)?;

        processed += plaintext.len() as u64;
        on_progress(processed, expected_total);
    }

    output.flush().map_err(CryptError::Io)?;

    let mut stored_mac = [0u8; MAC_LEN];
    artifact.read_exact(&mut stored_mac).map_err(|_| CryptError::corrupt("truncated trailing MAC"))?;
    mac.finalize_and_verify(&stored_mac)?;

    drop(aead);
    Ok(DecryptOutcome { header, bytes_written: processed })
}

/// Reads and AEAD-verifies only the header, per §4.6. Never touches the
/// chunk stream or trailing MAC.
///
/// # Errors
/// Same as [`decrypt`], restricted to header-parsing failure modes.
pub fn read_header<R: Read>(mut artifact: R, passphrase: &[u8], params: KdfParams) -> Result<Header> {
    let (header, ..) = read_header_prelude(&mut artifact, passphrase, params)?;
    Ok(header)
}

/// Steps 1-6 of the decryption algorithm: magic/version through the parsed,
/// AEAD-verified header. Shared by [`decrypt`] and [`read_header`].
fn read_header_prelude<R: Read>(
    artifact: &mut R,
    passphrase: &[u8],
    params: KdfParams,
) -> Result<(Header, StreamingMac, Aead20)> {
    let mut magic = [0u8; 4];
    artifact.read_exact(&mut magic).map_err(|_| CryptError::corrupt("truncated before magic"))?;
    if magic != MAGIC {
        return Err(CryptError::corrupt("bad magic bytes"));
    }

    let mut version = [0u8; 1];
    artifact.read_exact(&mut version).map_err(|_| CryptError::corrupt("truncated before version"))?;
    if version[0] != CURRENT_VERSION {
        return Err(CryptError::corrupt(format!("unsupported version {}", version[0])));
    }

    let mut salt = [0u8; SALT_LEN];
    artifact.read_exact(&mut salt).map_err(|_| CryptError::corrupt("truncated before salt"))?;

    let keys = kdf::derive(passphrase, &salt, params)?;
    let mut mac = StreamingMac::new(keys.mac_key.expose());
    mac.update(&magic);
    mac.update(&version);
    mac.update(&salt);

    let mut header_nonce = [0u8; NONCE_LEN];
    artifact.read_exact(&mut header_nonce).map_err(|_| CryptError::corrupt("truncated before header nonce"))?;
    mac.update(&header_nonce);

    let header_len = artifact.read_u32::<BigEndian>().map_err(|_| CryptError::corrupt("truncated before header length"))?;
    if header_len > MAX_HEADER_LEN {
        return Err(CryptError::corrupt(format!("header length {header_len} exceeds limit of {MAX_HEADER_LEN}")));
    }
    mac.update(&u32_be(header_len));

    let mut header_ct = vec![0u8; header_len as usize];
    artifact.read_exact(&mut header_ct).map_err(|_| CryptError::corrupt("truncated encrypted header"))?;
    mac.update(&header_ct);

    let mut header_tag = [0u8; TAG_LEN];
    artifact.read_exact(&mut header_tag).map_err(|_| CryptError::corrupt("truncated header tag"))?;
    mac.update(&header_tag);

    let aead = Aead20::new(keys.aead_key.expose());
    let mut sealed = header_ct;
    sealed.extend_from_slice(&header_tag);
    let header_plain = aead.open(&header_nonce, &sealed)?;
    let header = Header::deserialize(&header_plain)?;

    Ok((header, mac, aead))
}

/// Step 7 of the decryption algorithm: chunk size and chunk count, validated
/// against the header's `compressed_size`. Not part of [`read_header`]'s
/// contract; only [`decrypt`] needs the chunk stream's framing.
fn read_chunk_framing<R: Read>(artifact: &mut R, mac: &mut StreamingMac, header: &Header) -> Result<(u32, u64)> {
    let chunk_size = artifact.read_u32::<BigEndian>().map_err(|_| CryptError::corrupt("truncated before chunk size"))?;
    if chunk_size == 0 {
        return Err(CryptError::corrupt("chunk size is zero"));
    }
    mac.update(&u32_be(chunk_size));

    let chunk_count_raw = artifact.read_i64::<BigEndian>().map_err(|_| CryptError::corrupt("truncated before chunk count"))?;
    if chunk_count_raw < 0 {
        return Err(CryptError::corrupt("negative chunk count"));
    }
    mac.update(&i64_be(chunk_count_raw));

    let expected_count = if header.compressed_size == 0 {
        0
    } else {
        (header.compressed_size as u64).div_ceil(u64::from(chunk_size))
    };
    if chunk_count_raw as u64 != expected_count {
        return Err(CryptError::corrupt("chunk count inconsistent with declared compressed_size"));
    }

    Ok((chunk_size, chunk_count_raw as u64))
}

fn u32_be(v: u32) -> [u8; 4] {
    let mut w = Vec::with_capacity(4);
    w.write_u32::<BigEndian>(v).expect("write to Vec never fails");
    w.try_into().expect("exactly 4 bytes")
}

fn i64_be(v: i64) -> [u8; 8] {
    let mut w = Vec::with_capacity(8);
    w.write_i64::<BigEndian>(v).expect("write to Vec never fails");
    w.try_into().expect("exactly 8 bytes")
}
