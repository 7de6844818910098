// src/install/store.rs

//! The version store: one directory per installed version
//!
//! Removal here is best-effort and non-transactional. A failure half-way
//! through `clean` leaves whatever was already deleted deleted.

use super::link::ActiveLink;
use super::PAYLOAD_PREFIX;
use crate::error::{Error, Result};
use crate::paths::Layout;
use crate::version::ReleaseVersion;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// First executable regular file under `dir` whose name starts with the payload prefix
///
/// Traversal is in lexical order and the first match wins; an archive with
/// several matching executables silently yields the lexically first one.
pub fn find_payload(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(PAYLOAD_PREFIX))
        })
        .find(|e| {
            e.metadata()
                .map(|m| m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false)
        })
        .map(|e| e.into_path())
}

pub struct VersionStore<'a> {
    layout: &'a Layout,
}

impl<'a> VersionStore<'a> {
    pub fn new(layout: &'a Layout) -> Self {
        Self { layout }
    }

    pub fn root(&self) -> PathBuf {
        self.layout.versions_root()
    }

    fn active_link(&self) -> ActiveLink {
        ActiveLink::new(self.layout.active_link())
    }

    /// Executable of an installed version, if the version is fully installed
    pub fn executable(&self, version: &ReleaseVersion) -> Option<PathBuf> {
        let dir = self.layout.version_dir(version);
        if !dir.is_dir() {
            return None;
        }
        find_payload(&dir)
    }

    /// Installed versions, oldest first
    pub fn installed_versions(&self) -> Result<Vec<ReleaseVersion>> {
        let root = self.root();
        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::IoError(format!(
                    "Failed to read {}: {e}",
                    root.display()
                )));
            }
        };

        let mut versions: Vec<ReleaseVersion> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().and_then(|n| ReleaseVersion::parse(n).ok()))
            .collect();
        versions.sort();
        Ok(versions)
    }

    /// Version the ActiveLink currently targets
    ///
    /// Taken from the path component directly below the store root; a link
    /// pointing outside the store falls back to the nearest component that
    /// looks like a version.
    pub fn active_version(&self) -> Option<ReleaseVersion> {
        let target = self.active_link().target()?;
        debug!("Active link targets {}", target.display());

        if let Ok(rest) = target.strip_prefix(self.root()) {
            if let Some(Component::Normal(first)) = rest.components().next() {
                return first.to_str().and_then(|s| ReleaseVersion::parse(s).ok());
            }
        }

        target
            .components()
            .rev()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .find_map(|s| ReleaseVersion::parse(s).ok())
    }

    /// Remove one version, or the whole store when `version` is `None`
    ///
    /// Removing the version the ActiveLink points at also removes the link.
    pub fn uninstall(&self, version: Option<&ReleaseVersion>) -> Result<()> {
        let link = self.active_link();

        match version {
            None => {
                let root = self.root();
                if root.exists() {
                    fs::remove_dir_all(&root).map_err(|e| {
                        Error::IoError(format!("Failed to remove {}: {e}", root.display()))
                    })?;
                    info!("Removed version store {}", root.display());
                } else {
                    info!("No versions installed at {}", root.display());
                }
                link.remove()?;
            }
            Some(version) => {
                let dir = self.layout.version_dir(version);
                if !dir.is_dir() {
                    return Err(Error::VersionNotInstalled(version.to_string()));
                }

                let was_active = self.active_version().as_ref() == Some(version);

                fs::remove_dir_all(&dir).map_err(|e| {
                    Error::IoError(format!("Failed to remove {}: {e}", dir.display()))
                })?;
                info!("Removed Godot {} from {}", version, dir.display());

                if was_active {
                    link.remove()?;
                }
            }
        }

        Ok(())
    }

    /// Remove every installed version except the active one
    ///
    /// Returns the versions removed. Without an active link nothing is
    /// removed, since there is no way to tell which version to keep.
    pub fn clean(&self) -> Result<Vec<ReleaseVersion>> {
        let Some(active) = self.active_version() else {
            warn!("No active version linked; nothing cleaned");
            return Ok(Vec::new());
        };
        info!("Keeping active version {}", active);

        let mut removed = Vec::new();
        for version in self.installed_versions()? {
            if version == active {
                continue;
            }
            let dir = self.layout.version_dir(&version);
            match fs::remove_dir_all(&dir) {
                Ok(()) => {
                    info!("Removed Godot {}", version);
                    removed.push(version);
                }
                Err(e) => warn!("Failed to remove {}: {}", dir.display(), e),
            }
        }

        Ok(removed)
    }
}
