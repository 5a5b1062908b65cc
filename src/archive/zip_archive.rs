//! Directories become a single ZIP byte stream (no outer folder) and back.

use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::config::EXCLUDED_PATTERNS;
use crate::error::{CryptError, Result};

fn is_excluded(path: &Path) -> bool {
    path.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        EXCLUDED_PATTERNS.iter().any(|p| *p == name)
    })
}

/// Writes every regular file under `root` into a ZIP archive, with entry
/// names relative to `root` and forward-slash separators. Returns the total
/// uncompressed byte count of all archived files.
pub fn build<W: Write + Seek>(root: &Path, sink: W) -> Result<u64> {
    let mut zip = ZipWriter::new(sink);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    let mut total_uncompressed = 0u64;

    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_excluded(e.path())) {
        let entry = entry.map_err(|e| CryptError::internal(format!("directory walk failed: {e}")))?;
        let path = entry.path();
        if path == root {
            continue;
        }

        let relative = path.strip_prefix(root).expect("entry is under root by construction");
        let entry_name = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{entry_name}/"), options).map_err(CryptError::from)?;
        } else if entry.file_type().is_file() {
            zip.start_file(entry_name, options).map_err(CryptError::from)?;
            let mut file = File::open(path).map_err(CryptError::Io)?;
            total_uncompressed += io::copy(&mut file, &mut zip).map_err(CryptError::Io)?;
        }
    }

    zip.finish().map_err(CryptError::from)?;
    Ok(total_uncompressed)
}

/// Expands every entry of a ZIP archive read from `source` into `output_dir`,
/// creating parent directories as needed.
pub fn extract<R: Read + Seek>(source: R, output_dir: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(source).map_err(CryptError::from)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(CryptError::from)?;
        let Some(relative_path) = entry.enclosed_name() else {
            return Err(CryptError::corrupt("zip entry has an unsafe or absent name"));
        };
        let target = output_dir.join(relative_path);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(CryptError::Io)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(CryptError::Io)?;
        }
        let mut out_file = File::create(&target).map_err(CryptError::Io)?;
        io::copy(&mut entry, &mut out_file).map_err(CryptError::Io)?;
    }

    Ok(())
}
