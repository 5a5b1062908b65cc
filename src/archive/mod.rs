//! The archive façade: turns a file or directory into a single finite byte
//! stream the streaming engine can consume, and reverses that transform on
//! decryption. Directories are ZIPped (no outer folder); both files and ZIPs
//! may additionally be gzip-compressed. Everything here is a pure
//! byte-stream transform over temp files, so the encryption core never knows
//! which path produced its payload.

pub mod gzip;
pub mod zip_archive;

use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{CryptError, Result};
use crate::stream::HeaderInput;

/// A payload ready to be handed to the streaming engine: an open, rewound
/// temp file plus the header fields the archive transform determined.
pub struct PreparedPayload {
    pub file: File,
    pub len: u64,
    pub header_input: HeaderInput,
    _temp: NamedTempFile,
}

/// Builds a [`PreparedPayload`] for `input_path`, which may be a file or a
/// directory.
///
/// # Errors
/// [`CryptError::InvalidInput`] if `input_path` does not exist or its
/// basename is not valid UTF-8; [`CryptError::Io`] for any filesystem
/// failure.
pub fn prepare_encrypt(input_path: &Path, enable_gzip: bool, custom_uuid: Option<String>) -> Result<PreparedPayload> {
    if !input_path.exists() {
        return Err(CryptError::invalid_input(format!("input path does not exist: {}", input_path.display())));
    }

    let original_name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CryptError::invalid_input("input path has no valid UTF-8 file name"))?
        .to_owned();

    let uuid = custom_uuid.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let was_directory = input_path.is_dir();

    if was_directory {
        prepare_directory(input_path, &original_name, uuid, enable_gzip)
    } else {
        prepare_file(input_path, &original_name, uuid, enable_gzip)
    }
}

fn prepare_file(input_path: &Path, original_name: &str, uuid: String, enable_gzip: bool) -> Result<PreparedPayload> {
    let original_size = fs::metadata(input_path).map_err(CryptError::Io)?.len();
    let original_extension = input_path.extension().and_then(|e| e.to_str()).unwrap_or("").to_owned();

    let mut temp = NamedTempFile::new().map_err(CryptError::Io)?;
    let len = if enable_gzip {
        let source = File::open(input_path).map_err(CryptError::Io)?;
        gzip::compress(source, temp.as_file_mut())?
    } else {
        let mut source = File::open(input_path).map_err(CryptError::Io)?;
        std::io::copy(&mut source, temp.as_file_mut()).map_err(CryptError::Io)?
    };

    let mut file = temp.reopen().map_err(CryptError::Io)?;
    file.seek(SeekFrom::Start(0)).map_err(CryptError::Io)?;

    Ok(PreparedPayload {
        file,
        len,
        header_input: HeaderInput {
            uuid,
            original_name: original_name.to_owned(),
            original_extension,
            was_directory: false,
            is_compressed: enable_gzip,
            original_size: i64::try_from(original_size).map_err(|_| CryptError::invalid_input("file too large"))?,
        },
        _temp: temp,
    })
}

fn prepare_directory(input_path: &Path, original_name: &str, uuid: String, enable_gzip: bool) -> Result<PreparedPayload> {
    let mut zip_temp = NamedTempFile::new().map_err(CryptError::Io)?;
    let original_size = zip_archive::build(input_path, zip_temp.as_file_mut())?;
    zip_temp.as_file_mut().seek(SeekFrom::Start(0)).map_err(CryptError::Io)?;

    let mut final_temp = NamedTempFile::new().map_err(CryptError::Io)?;
    let len = if enable_gzip {
        let zip_reader = zip_temp.reopen().map_err(CryptError::Io)?;
        gzip::compress(zip_reader, final_temp.as_file_mut())?
    } else {
        let mut zip_reader = zip_temp.reopen().map_err(CryptError::Io)?;
        std::io::copy(&mut zip_reader, final_temp.as_file_mut()).map_err(CryptError::Io)?
    };

    let mut file = final_temp.reopen().map_err(CryptError::Io)?;
    file.seek(SeekFrom::Start(0)).map_err(CryptError::Io)?;

    Ok(PreparedPayload {
        file,
        len,
        header_input: HeaderInput {
            uuid,
            original_name: original_name.to_owned(),
            original_extension: String::new(),
            was_directory: true,
            is_compressed: enable_gzip,
            original_size: i64::try_from(original_size).map_err(|_| CryptError::invalid_input("directory too large"))?,
        },
        _temp: final_temp,
    })
}

/// Reverses [`prepare_encrypt`]: given the recovered payload temp file and
/// parsed header, restores the original file or directory under
/// `output_dir`.
///
/// # Errors
/// [`CryptError::Corrupt`] if the payload is not valid gzip/ZIP data when the
/// header says it should be; [`CryptError::Io`] for filesystem failures.
pub fn finalize_decrypt(header: &crate::format::Header, mut payload: File, output_dir: &Path) -> Result<PathBuf> {
    payload.seek(SeekFrom::Start(0)).map_err(CryptError::Io)?;

    if header.was_directory {
        finalize_directory(header, payload, output_dir)
    } else {
        finalize_file(header, payload, output_dir)
    }
}

fn finalize_directory(header: &crate::format::Header, payload: File, output_dir: &Path) -> Result<PathBuf> {
    let target_root = output_dir.join(&header.original_name);
    fs::create_dir_all(&target_root).map_err(CryptError::Io)?;

    if header.is_compressed {
        let mut zip_temp = NamedTempFile::new().map_err(CryptError::Io)?;
        gzip::decompress(payload, zip_temp.as_file_mut())?;
        zip_temp.as_file_mut().seek(SeekFrom::Start(0)).map_err(CryptError::Io)?;
        zip_archive::extract(zip_temp.reopen().map_err(CryptError::Io)?, &target_root)?;
    } else {
        zip_archive::extract(payload, &target_root)?;
    }

    Ok(target_root)
}

fn finalize_file(header: &crate::format::Header, payload: File, output_dir: &Path) -> Result<PathBuf> {
    let target_name = if header.original_extension.is_empty() || header.original_name.ends_with(&format!(".{}", header.original_extension)) {
        header.original_name.clone()
    } else {
        format!("{}.{}", header.original_name, header.original_extension)
    };

    fs::create_dir_all(output_dir).map_err(CryptError::Io)?;
    let target_path = output_dir.join(target_name);
    let mut out_file = File::create(&target_path).map_err(CryptError::Io)?;

    if header.is_compressed {
        gzip::decompress(payload, &mut out_file)?;
    } else {
        let mut payload = payload;
        std::io::copy(&mut payload, &mut out_file).map_err(CryptError::Io)?;
    }

    Ok(target_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Header;
    use tempfile::tempdir;

    #[test]
    fn prepare_and_finalize_roundtrip_a_plain_file() {
        let src = tempdir().unwrap();
        let input = src.path().join("notes.txt");
        fs::write(&input, b"hello from a file").unwrap();

        let prepared = prepare_encrypt(&input, true, None).unwrap();
        assert_eq!(prepared.header_input.original_name, "notes.txt");
        assert_eq!(prepared.header_input.original_extension, "txt");
        assert!(!prepared.header_input.was_directory);

        let header = Header {
            uuid: prepared.header_input.uuid.clone(),
            original_name: prepared.header_input.original_name.clone(),
            original_extension: prepared.header_input.original_extension.clone(),
            was_directory: false,
            is_compressed: true,
            original_size: prepared.header_input.original_size,
            compressed_size: prepared.len as i64,
        };

        let dst = tempdir().unwrap();
        let target = finalize_decrypt(&header, prepared.file, dst.path()).unwrap();
        assert_eq!(fs::read(target).unwrap(), b"hello from a file");
    }

    #[test]
    fn prepare_and_finalize_roundtrip_a_directory() {
        let src = tempdir().unwrap();
        let dir = src.path().join("project");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("a.txt"), b"A").unwrap();

        let prepared = prepare_encrypt(&dir, false, None).unwrap();
        assert!(prepared.header_input.was_directory);

        let header = Header {
            uuid: prepared.header_input.uuid.clone(),
            original_name: prepared.header_input.original_name.clone(),
            original_extension: String::new(),
            was_directory: true,
            is_compressed: false,
            original_size: prepared.header_input.original_size,
            compressed_size: prepared.len as i64,
        };

        let dst = tempdir().unwrap();
        let target = finalize_decrypt(&header, prepared.file, dst.path()).unwrap();
        assert_eq!(fs::read(target.join("a.txt")).unwrap(), b"A");
    }

    #[test]
    fn prepare_encrypt_rejects_missing_path() {
        let missing = Path::new("/nonexistent/path/does/not/exist");
        assert!(prepare_encrypt(missing, false, None).is_err());
    }
}
