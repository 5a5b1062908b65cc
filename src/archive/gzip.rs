//! Gzip as a pure byte-stream transform.
//!
//! Compression runs *before* encryption so the streaming engine only ever
//! sees a single finite byte stream of known length. It is oblivious to
//! whether that stream is raw file bytes, a ZIP archive, or both.

use std::io::{self, Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::config::IO_BUFFER_SIZE;
use crate::error::{CryptError, Result};

/// Gzip-compresses everything read from `input` into `output`, returning the
/// number of compressed bytes written.
pub fn compress<R: Read, W: Write>(mut input: R, output: W) -> Result<u64> {
    let mut encoder = GzEncoder::new(output, Compression::default());
    let written = copy_buffered(&mut input, &mut encoder).map_err(CryptError::Io)?;
    encoder.finish().map_err(CryptError::Io)?;
    Ok(written)
}

/// Gzip-decompresses everything read from `input` into `output`.
///
/// # Errors
/// [`CryptError::Corrupt`] if `input` is not valid gzip data.
pub fn decompress<R: Read, W: Write>(input: R, mut output: W) -> Result<u64> {
    let mut decoder = GzDecoder::new(input);
    copy_buffered(&mut decoder, &mut output).map_err(|e| CryptError::corrupt(format!("gzip decompression failed: {e}")))
}

fn copy_buffered<R: Read, W: Write>(input: &mut R, output: &mut W) -> io::Result<u64> {
    let mut buf = vec![0u8; IO_BUFFER_SIZE];
    let mut total = 0u64;
    loop {
        let n = input.read(&mut buf)?;
        if n == 0 {
            break;
        }
        output.write_all(&buf[..n])?;
        total += n as u64;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_then_decompress_roundtrips() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(100);

        let mut compressed = Vec::new();
        compress(&data[..], &mut compressed).unwrap();
        assert!(compressed.len() < data.len());

        let mut recovered = Vec::new();
        decompress(&compressed[..], &mut recovered).unwrap();
        assert_eq!(recovered, data);
    }

    #[test]
    fn compress_handles_empty_input() {
        let mut compressed = Vec::new();
        compress(&b""[..], &mut compressed).unwrap();

        let mut recovered = Vec::new();
        decompress(&compressed[..], &mut recovered).unwrap();
        assert!(recovered.is_empty());
    }

    #[test]
    fn decompress_rejects_non_gzip_data() {
        let mut recovered = Vec::new();
        let err = decompress(&b"not gzip data at all"[..], &mut recovered).unwrap_err();
        assert!(matches!(err, CryptError::Corrupt(_)));
    }
}
