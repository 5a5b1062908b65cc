//! Fixed-size chunk reader for the streaming engine's encryption path.

use std::io::{self, Read};

/// Reads a byte source out in fixed-size chunks.
///
/// Mirrors the buffer-until-chunk-size strategy of the container format: the
/// last chunk returned may be shorter than `chunk_size`, and an exhausted
/// source yields an empty chunk.
pub struct ChunkReader<R> {
    inner: R,
    chunk_size: usize,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(inner: R, chunk_size: usize) -> Self {
        Self { inner, chunk_size }
    }

    /// Reads the next chunk, which is empty only at end of stream.
    pub fn read_chunk(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;

        while filled < self.chunk_size {
            let n = self.inner.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        buf.truncate(filled);
        Ok(buf)
    }
}
