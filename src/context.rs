// src/context.rs

//! Per-run state for mutating commands
//!
//! A [`RunContext`] owns the instance lock and every temporary resource the
//! run creates. Dropping it removes scratch directories and any partially
//! built install directory that was never committed, whichever way the run
//! ended. The lock is released last.

use crate::error::{Error, Result};
use crate::lock::InstanceLock;
use crate::paths::{Layout, APP_NAME};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

pub struct RunContext {
    layout: Layout,
    scratch: Vec<TempDir>,
    partial: Vec<PathBuf>,
    // Declared last so it drops after the cleanup in `Drop::drop` has run
    lock: InstanceLock,
}

impl RunContext {
    /// Acquire the instance lock for `layout` and start a run
    pub fn acquire(layout: Layout) -> Result<Self> {
        let lock = InstanceLock::try_acquire(layout.lock_file())?;
        Ok(Self {
            layout,
            scratch: Vec::new(),
            partial: Vec::new(),
            lock,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn lock_path(&self) -> &Path {
        self.lock.path()
    }

    /// Create a scratch directory that lives until the context is dropped
    pub fn scratch_dir(&mut self, label: &str) -> Result<PathBuf> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("{APP_NAME}-{label}-"))
            .tempdir()
            .map_err(|e| Error::IoError(format!("Failed to create scratch directory: {e}")))?;
        let path = dir.path().to_path_buf();
        debug!("Created scratch directory {}", path.display());
        self.scratch.push(dir);
        Ok(path)
    }

    /// Register a directory to delete unless [`commit`](Self::commit) is called
    pub fn track_partial(&mut self, path: &Path) {
        self.partial.push(path.to_path_buf());
    }

    /// Keep a tracked directory
    pub fn commit(&mut self, path: &Path) {
        self.partial.retain(|p| p != path);
    }
}

impl Drop for RunContext {
    fn drop(&mut self) {
        for path in self.partial.drain(..) {
            warn!("Removing incomplete install at {}", path.display());
            if let Err(e) = fs::remove_dir_all(&path) {
                warn!("Failed to remove {}: {}", path.display(), e);
            }
        }

        for dir in self.scratch.drain(..) {
            let path = dir.path().to_path_buf();
            match dir.close() {
                Ok(()) => debug!("Removed scratch directory {}", path.display()),
                Err(e) => warn!("Failed to remove scratch directory {}: {}", path.display(), e),
            }
        }
    }
}
