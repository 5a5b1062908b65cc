//! The plaintext header: everything needed to reverse the archive transform,
//! encrypted as a single AEAD-sealed blob inside the artifact.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

use crate::config::{MAX_EXTENSION_LEN, MAX_NAME_LEN, MAX_UUID_LEN};
use crate::error::{CryptError, Result};

/// Metadata describing the original content, carried encrypted inside every
/// artifact. See the container format's encrypted-header layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub uuid: String,
    pub original_name: String,
    pub original_extension: String,
    pub was_directory: bool,
    pub is_compressed: bool,
    pub original_size: i64,
    pub compressed_size: i64,
}

impl Header {
    /// Serializes the header to its plaintext byte layout.
    ///
    /// # Errors
    /// Returns [`CryptError::InvalidInput`] if any field exceeds the layout's
    /// fixed-width length prefix.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let uuid_bytes = self.uuid.as_bytes();
        let name_bytes = self.original_name.as_bytes();
        let ext_bytes = self.original_extension.as_bytes();

        if uuid_bytes.len() > MAX_UUID_LEN {
            return Err(CryptError::invalid_input(format!("uuid too long: {} bytes (max {MAX_UUID_LEN})", uuid_bytes.len())));
        }
        if name_bytes.len() > MAX_NAME_LEN {
            return Err(CryptError::invalid_input(format!("original_name too long: {} bytes (max {MAX_NAME_LEN})", name_bytes.len())));
        }
        if ext_bytes.len() > MAX_EXTENSION_LEN {
            return Err(CryptError::invalid_input(format!("original_extension too long: {} bytes (max {MAX_EXTENSION_LEN})", ext_bytes.len())));
        }
        if self.original_size < 0 || self.compressed_size < 0 {
            return Err(CryptError::invalid_input("sizes must be non-negative"));
        }

        let mut buf = Vec::with_capacity(1 + uuid_bytes.len() + 2 + name_bytes.len() + 1 + ext_bytes.len() + 1 + 1 + 8 + 8);

        buf.write_u8(uuid_bytes.len() as u8).expect("write to Vec never fails");
        buf.write_all(uuid_bytes).expect("write to Vec never fails");
        buf.write_u16::<BigEndian>(name_bytes.len() as u16).expect("write to Vec never fails");
        buf.write_all(name_bytes).expect("write to Vec never fails");
        buf.write_u8(ext_bytes.len() as u8).expect("write to Vec never fails");
        buf.write_all(ext_bytes).expect("write to Vec never fails");
        buf.write_u8(u8::from(self.was_directory)).expect("write to Vec never fails");
        buf.write_u8(u8::from(self.is_compressed)).expect("write to Vec never fails");
        buf.write_i64::<BigEndian>(self.original_size).expect("write to Vec never fails");
        buf.write_i64::<BigEndian>(self.compressed_size).expect("write to Vec never fails");

        Ok(buf)
    }

    /// Parses a header from its plaintext byte layout.
    ///
    /// # Errors
    /// Returns [`CryptError::Corrupt`] if `data` is short, a length prefix is
    /// inconsistent with the remaining bytes, or a string field is not valid
    /// UTF-8.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let corrupt = |msg: &str| CryptError::corrupt(format!("malformed header: {msg}"));

        let uuid_len = cursor.read_u8().map_err(|_| corrupt("truncated before uuid length"))?;
        let uuid = read_utf8(&mut cursor, uuid_len as usize, "uuid")?;

        let name_len = cursor.read_u16::<BigEndian>().map_err(|_| corrupt("truncated before name length"))?;
        let original_name = read_utf8(&mut cursor, name_len as usize, "original_name")?;

        let ext_len = cursor.read_u8().map_err(|_| corrupt("truncated before extension length"))?;
        let original_extension = read_utf8(&mut cursor, ext_len as usize, "original_extension")?;

        let was_directory = cursor.read_u8().map_err(|_| corrupt("truncated before was_directory"))? != 0;
        let is_compressed = cursor.read_u8().map_err(|_| corrupt("truncated before is_compressed"))? != 0;

        let original_size = cursor.read_i64::<BigEndian>().map_err(|_| corrupt("truncated before original_size"))?;
        let compressed_size = cursor.read_i64::<BigEndian>().map_err(|_| corrupt("truncated before compressed_size"))?;

        if original_size < 0 || compressed_size < 0 {
            return Err(corrupt("negative size field"));
        }

        Ok(Self { uuid, original_name, original_extension, was_directory, is_compressed, original_size, compressed_size })
    }
}

fn read_utf8(cursor: &mut Cursor<&[u8]>, len: usize, field: &str) -> Result<String> {
    let mut buf = vec![0u8; len];
    cursor.read_exact(&mut buf).map_err(|_| CryptError::corrupt(format!("truncated {field} field")))?;
    String::from_utf8(buf).map_err(|_| CryptError::corrupt(format!("invalid UTF-8 in {field} field")))
}
