// src/lock.rs

//! Single-instance lock
//!
//! Installer runs that mutate state hold an exclusive `flock` on a well-known
//! file for their whole lifetime. Acquisition never waits: a second process
//! fails immediately with [`Error::InstanceAlreadyRunning`].
//!
//! The lock is tied to the open file description, so the kernel releases it
//! when the process exits for any reason. Dropping the guard is only needed
//! to release it earlier.

use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Held exclusive lock
pub struct InstanceLock {
    /// The lock file handle (kept open to maintain lock)
    #[allow(dead_code)]
    file: File,
    /// Path to the lock file
    path: PathBuf,
}

impl InstanceLock {
    /// Try to acquire the lock without blocking
    pub fn try_acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create lock directory {}: {e}", parent.display()))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| Error::IoError(format!("Failed to open lock file {}: {e}", path.display())))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired instance lock at {}", path.display());
                let lock = Self { file, path };
                lock.write_pid();
                Ok(lock)
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                let holder = Self::holder_pid(&path)
                    .map(|pid| format!("{} by pid {pid}", path.display()))
                    .unwrap_or_else(|| path.display().to_string());
                Err(Error::InstanceAlreadyRunning(holder))
            }
            Err(e) => Err(Error::IoError(format!(
                "Failed to try-acquire instance lock: {e}"
            ))),
        }
    }

    /// Check if the lock is currently held by anyone
    pub fn is_held<P: AsRef<Path>>(path: P) -> bool {
        let file = match File::open(path.as_ref()) {
            Ok(f) => f,
            Err(_) => return false,
        };

        match file.try_lock_exclusive() {
            Ok(()) => {
                let _ = file.unlock();
                false
            }
            Err(_) => true,
        }
    }

    /// Get the path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PID recorded by the current holder, if any
    pub fn holder_pid<P: AsRef<Path>>(lock_path: P) -> Option<u32> {
        fs::read_to_string(lock_path.as_ref().with_extension("pid"))
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }

    /// Best effort: the PID only improves the contention message
    fn write_pid(&self) {
        let _ = fs::write(self.path.with_extension("pid"), std::process::id().to_string());
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(self.path.with_extension("pid"));
        // Lock is released when the file is closed
        debug!("Released instance lock at {}", self.path.display());
    }
}
