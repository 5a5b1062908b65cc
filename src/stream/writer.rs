//! A writer that tees every byte into the streaming whole-file MAC.
//!
//! Every artifact byte from the magic number through the last chunk's tag
//! must be fed to the trailing HMAC in the exact order it was written. This
//! wrapper makes that impossible to forget: call [`MacWriter::write_all`]
//! instead of writing to the sink directly and the MAC stays in sync by
//! construction.

use std::io::{self, Write};

use crate::format::mac::StreamingMac;

/// Wraps a sink, feeding every written byte to a [`StreamingMac`].
pub struct MacWriter<W> {
    sink: W,
    mac: StreamingMac,
    bytes_written: u64,
}

impl<W: Write> MacWriter<W> {
    pub fn new(sink: W, mac: StreamingMac) -> Self {
        Self { sink, mac, bytes_written: 0 }
    }

    /// Writes `bytes` to the sink and feeds them to the MAC.
    pub fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink.write_all(bytes)?;
        self.mac.update(bytes);
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Total bytes written so far (excludes the eventual trailing MAC field).
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Consumes the writer, returning the underlying sink and the finalized
    /// MAC accumulator so the caller can append the trailing digest.
    pub fn into_parts(self) -> (W, StreamingMac) {
        (self.sink, self.mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_bytes_written_and_feeds_mac() {
        let key = [9u8; 32];
        let mut writer = MacWriter::new(Vec::new(), StreamingMac::new(&key));

        writer.write_all(b"hello").unwrap();
        writer.write_all(b", world").unwrap();
        assert_eq!(writer.bytes_written(), 12);

        let (sink, mac) = writer.into_parts();
        assert_eq!(sink, b"hello, world");

        let mut reference = StreamingMac::new(&key);
        reference.update(b"hello, world");
        assert_eq!(mac.finalize(), reference.finalize());
    }
}
