// src/repository/download.rs

//! Asset download with bounded retries
//!
//! Each attempt truncates the destination file and writes it from scratch;
//! partial files are never resumed.

use super::client::Transport;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Maximum download attempts
pub const MAX_ATTEMPTS: u32 = 3;

/// Fixed pause between attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Last path segment of a URL, ignoring any query or fragment
pub fn filename_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

/// Fetches assets into a local directory
pub struct Downloader<'a> {
    transport: &'a dyn Transport,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<'a> Downloader<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            max_attempts: MAX_ATTEMPTS,
            retry_delay: RETRY_DELAY,
        }
    }

    /// Override the pause between attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Download `url` into `dest_dir`, returning the path of the written file
    ///
    /// Transport failures (connection errors, timeouts, non-2xx statuses) are
    /// retried; local I/O errors are returned immediately.
    pub fn fetch(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let filename = filename_from_url(url)
            .ok_or_else(|| Error::Parse(format!("No file name in URL: {url}")))?;
        let dest_path = dest_dir.join(filename);

        fs::create_dir_all(dest_dir).map_err(|e| {
            Error::IoError(format!("Failed to create directory {}: {e}", dest_dir.display()))
        })?;

        info!("Downloading {}", url);

        let mut attempt = 0;
        loop {
            attempt += 1;

            let mut file = File::create(&dest_path).map_err(|e| {
                Error::IoError(format!("Failed to create file {}: {e}", dest_path.display()))
            })?;

            match self.transport.download(url, &mut file) {
                Ok(bytes) => {
                    file.sync_all().map_err(|e| {
                        Error::IoError(format!("Failed to sync {}: {e}", dest_path.display()))
                    })?;
                    info!("Downloaded {} bytes to {}", bytes, dest_path.display());
                    return Ok(dest_path);
                }
                Err(e) if e.is_transport() => {
                    if attempt >= self.max_attempts {
                        warn!("Download attempt {} failed: {}, giving up", attempt, e);
                        drop(file);
                        let _ = fs::remove_file(&dest_path);
                        return Err(Error::DownloadFailed {
                            url: url.to_string(),
                            attempts: attempt,
                        });
                    }
                    warn!(
                        "Download attempt {} of {} failed: {}, retrying in {}s...",
                        attempt,
                        self.max_attempts,
                        e,
                        self.retry_delay.as_secs()
                    );
                    thread::sleep(self.retry_delay);
                }
                Err(e) => {
                    drop(file);
                    let _ = fs::remove_file(&dest_path);
                    return Err(e);
                }
            }
        }
    }
}
