// src/verify.rs

//! Release integrity verification
//!
//! Every release publishes `SHA512-SUMS.txt`, one `<hex-digest>  <filename>`
//! line per asset. The downloaded archive is hashed and compared against the
//! line naming it.

use crate::arch::Architecture;
use crate::error::{Error, Result};
use crate::hash::{self, HashAlgorithm, VerifyError};
use crate::repository::ReleaseIndex;
use crate::version::ReleaseVersion;
use std::path::Path;
use tracing::{debug, error, info};

/// Algorithm of the published manifest
const MANIFEST_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha512;

/// One manifest line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub digest: String,
    pub filename: String,
}

/// Parsed checksum manifest, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecksumManifest {
    entries: Vec<ManifestEntry>,
}

impl ChecksumManifest {
    /// Parse `sha*sum`-style output
    ///
    /// Blank lines and lines without a filename are skipped. A leading `*`
    /// (binary mode marker) is stripped from filenames.
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let digest = fields.next()?;
                let filename = fields.collect::<Vec<_>>().join(" ");
                let filename = filename.strip_prefix('*').unwrap_or(&filename);
                if filename.is_empty() {
                    return None;
                }
                Some(ManifestEntry {
                    digest: digest.to_string(),
                    filename: filename.to_string(),
                })
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// First entry whose filename contains `name`
    pub fn find(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.filename.contains(name))
    }

    /// Every filename listed, for diagnostics
    pub fn filenames(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.filename.as_str()).collect()
    }
}

/// Confirm `path` matches the digest published for it
///
/// Fails with [`Error::ChecksumNotFound`] when the manifest is unavailable or
/// does not list the file, and [`Error::ChecksumMismatch`] when the digests
/// differ. Neither is ever downgraded to a warning.
pub fn verify(
    index: &dyn ReleaseIndex,
    path: &Path,
    version: &ReleaseVersion,
    arch: Architecture,
) -> Result<()> {
    let basename = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::IoError(format!("Invalid file path: {}", path.display())))?;

    info!("Verifying {} ({}, {})", basename, version, arch);

    let text = index.checksum_manifest(version).map_err(|e| {
        Error::ChecksumNotFound(format!("checksum manifest for {} unavailable: {e}", version.tag()))
    })?;
    let manifest = ChecksumManifest::parse(&text);

    let Some(entry) = manifest.find(basename) else {
        error!(
            "Checksum manifest for {} has no entry for {}; it lists:",
            version.tag(),
            basename
        );
        for name in manifest.filenames() {
            error!("  {}", name);
        }
        return Err(Error::ChecksumNotFound(format!(
            "no entry for {} in {} manifest",
            basename,
            version.tag()
        )));
    };

    debug!("Expected {} digest {}", MANIFEST_ALGORITHM, entry.digest);

    hash::verify_file(path, &entry.digest, MANIFEST_ALGORITHM).map_err(|e| match e {
        VerifyError::Io(e) => {
            Error::IoError(format!("Failed to read {} for verification: {e}", path.display()))
        }
        VerifyError::Mismatch {
            expected, actual, ..
        } => {
            error!("Checksum mismatch for {}", basename);
            error!("  expected: {}", expected);
            error!("  actual:   {}", actual);
            Error::ChecksumMismatch { expected, actual }
        }
    })?;

    info!("Checksum verified for {}", basename);
    Ok(())
}
