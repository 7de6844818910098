// src/install/archive.rs

//! Zip extraction for release archives

use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Unpack `archive` into `dest`, returning the number of files written
///
/// Entries are confined to `dest`; any entry whose path would escape it is an
/// error. Unix permissions recorded in the archive are applied when present.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).map_err(|e| {
        Error::Extraction(format!("Failed to open {}: {e}", archive.display()))
    })?;
    let mut zip = ZipArchive::new(file).map_err(|e| {
        Error::Extraction(format!("{} is not a readable zip archive: {e}", archive.display()))
    })?;

    fs::create_dir_all(dest)?;

    let mut written = 0;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| Error::Extraction(format!("Failed to read entry {index}: {e}")))?;

        let relative = entry.enclosed_name().ok_or_else(|| {
            Error::Extraction(format!("Unsafe path in archive: {}", entry.name()))
        })?;
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&out_path).map_err(|e| {
            Error::IoError(format!("Failed to create {}: {e}", out_path.display()))
        })?;
        io::copy(&mut entry, &mut out).map_err(|e| {
            Error::Extraction(format!("Failed to extract {}: {e}", entry.name()))
        })?;

        if let Some(mode) = entry.unix_mode() {
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o7777))?;
        }

        debug!("Extracted {}", out_path.display());
        written += 1;
    }

    Ok(written)
}
