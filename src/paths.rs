// src/paths.rs
//! Centralized path derivation for installer directories
//!
//! Everything lives under per-user base directories taken from
//! `XDG_BIN_HOME`, `XDG_DATA_HOME` and `XDG_CACHE_HOME`, defaulting to
//! `~/.local/bin`, `~/.local/share` and `~/.cache`.

use crate::error::{Error, Result};
use crate::version::ReleaseVersion;
use std::path::{Path, PathBuf};

/// Name of the installer's own subdirectories and lock file
pub const APP_NAME: &str = "godot-installer";

/// Name of the ActiveLink in the executables directory
pub const ACTIVE_LINK_NAME: &str = "godot";

/// Resolved per-user layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub bin_dir: PathBuf,
    pub data_dir: PathBuf,
    pub cache_dir: PathBuf,
}

impl Layout {
    /// Build the layout from the process environment
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;
        Ok(Self::from_lookup(&home, |var| std::env::var(var).ok()))
    }

    /// Build the layout from an arbitrary variable lookup
    ///
    /// Unset, empty, or relative values fall back to the default under `home`.
    pub fn from_lookup(home: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = |var: &str, default: &str| {
            lookup(var)
                .map(PathBuf::from)
                .filter(|p| p.is_absolute())
                .unwrap_or_else(|| home.join(default))
        };

        Self {
            bin_dir: base("XDG_BIN_HOME", ".local/bin"),
            data_dir: base("XDG_DATA_HOME", ".local/share"),
            cache_dir: base("XDG_CACHE_HOME", ".cache"),
        }
    }

    /// Layout rooted at a single directory (`bin/`, `share/`, `cache/`)
    pub fn with_root(root: &Path) -> Self {
        Self {
            bin_dir: root.join("bin"),
            data_dir: root.join("share"),
            cache_dir: root.join("cache"),
        }
    }

    /// Root of the version store
    pub fn versions_root(&self) -> PathBuf {
        self.data_dir.join(APP_NAME).join("versions")
    }

    /// Install directory of one version
    pub fn version_dir(&self, version: &ReleaseVersion) -> PathBuf {
        self.versions_root().join(version.as_str())
    }

    /// The ActiveLink
    pub fn active_link(&self) -> PathBuf {
        self.bin_dir.join(ACTIVE_LINK_NAME)
    }

    /// Where the installer copies itself
    pub fn self_copy(&self) -> PathBuf {
        self.bin_dir.join(APP_NAME)
    }

    /// Application-menu entry
    pub fn desktop_entry(&self) -> PathBuf {
        self.data_dir.join("applications").join("godot.desktop")
    }

    /// Application icon
    pub fn icon(&self) -> PathBuf {
        self.data_dir
            .join("icons/hicolor/scalable/apps")
            .join("godot.svg")
    }

    /// Single-instance lock file
    pub fn lock_file(&self) -> PathBuf {
        self.cache_dir.join(APP_NAME).join(format!("{APP_NAME}.lock"))
    }
}
