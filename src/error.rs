// src/error.rs

//! Error types for the installer
//!
//! Every pipeline stage reports failures through [`Error`]. None of them are
//! recovered locally: the binary logs the error and exits non-zero.

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, fetching, verifying or installing a release
#[derive(Error, Debug)]
pub enum Error {
    /// Host machine type is not one of the recognized aliases
    #[error("Unsupported architecture: {0}")]
    UnsupportedArchitecture(String),

    /// Requested version does not look like X.Y or X.Y.Z
    #[error("Invalid version format '{0}': expected X.Y or X.Y.Z")]
    InvalidVersionFormat(String),

    /// Release index unreachable, empty, or its latest tag is unusable
    #[error("No release found: {0}")]
    NoReleaseFound(String),

    /// Neither the requested architecture nor its fallback has an asset
    #[error("No release asset for Godot {version} ({arch})")]
    AssetNotFound { version: String, arch: String },

    /// Every download attempt failed
    #[error("Failed to download {url} after {attempts} attempts")]
    DownloadFailed { url: String, attempts: u32 },

    /// Checksum manifest missing, unreachable, or without an entry for the file
    #[error("Checksum not found: {0}")]
    ChecksumNotFound(String),

    /// Downloaded file does not match its published digest
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Archive could not be read or unpacked
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// No executable in the archive matched the payload name pattern
    #[error("Executable payload not found: {0}")]
    PayloadNotFound(String),

    /// Another installer process holds the run lock
    #[error("Another instance is already running (lock held at {0})")]
    InstanceAlreadyRunning(String),

    /// Uninstall was asked for a version that has no directory in the store
    #[error("Version {0} is not installed")]
    VersionNotInstalled(String),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    /// Connection, timeout, or body read failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed response from the release index
    #[error("Parse error: {0}")]
    Parse(String),

    /// Base directories could not be determined
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error with context
    #[error("I/O error: {0}")]
    IoError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether a retry of the same request could succeed
    ///
    /// Transport failures and HTTP errors are retried by the downloader;
    /// local I/O errors (disk full, permissions) are not.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        match (e.status(), e.url()) {
            (Some(status), Some(url)) => Self::Http {
                url: url.to_string(),
                status: status.as_u16(),
            },
            _ => Self::Transport(e.to_string()),
        }
    }
}
