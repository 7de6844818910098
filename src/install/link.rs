// src/install/link.rs

//! The ActiveLink: one symlink naming the executable in use

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct ActiveLink {
    path: PathBuf,
}

impl ActiveLink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything (even a dangling link) occupies the link path
    pub fn exists(&self) -> bool {
        self.path.symlink_metadata().is_ok()
    }

    /// Where the link currently points, if it is a symlink
    pub fn target(&self) -> Option<PathBuf> {
        fs::read_link(&self.path).ok()
    }

    /// Point the link at `target`, replacing whatever link was there
    ///
    /// Anything at the link path that is not a symlink is left alone and
    /// reported as an error. The old link is removed before the new one is
    /// created, so there is a brief window with no link at all.
    pub fn point_to(&self, target: &Path) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        if let Ok(meta) = self.path.symlink_metadata() {
            if !meta.file_type().is_symlink() {
                return Err(Error::IoError(format!(
                    "{} exists but is not a symlink; refusing to replace it",
                    self.path.display()
                )));
            }
            fs::remove_file(&self.path)?;
        }

        std::os::unix::fs::symlink(target, &self.path).map_err(|e| {
            Error::IoError(format!(
                "Failed to link {} -> {}: {e}",
                self.path.display(),
                target.display()
            ))
        })?;

        info!("Linked {} -> {}", self.path.display(), target.display());
        Ok(())
    }

    /// Remove the link if present; returns whether anything was removed
    pub fn remove(&self) -> Result<bool> {
        match self.path.symlink_metadata() {
            Ok(meta) if meta.file_type().is_symlink() => {
                fs::remove_file(&self.path)?;
                info!("Removed {}", self.path.display());
                Ok(true)
            }
            Ok(_) => Err(Error::IoError(format!(
                "{} exists but is not a symlink; leaving it alone",
                self.path.display()
            ))),
            Err(_) => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_point_and_repoint() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a");
        let b = temp.path().join("b");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let link = ActiveLink::new(temp.path().join("bin/godot"));
        assert!(!link.exists());

        link.point_to(&a).unwrap();
        assert_eq!(link.target().unwrap(), a);

        link.point_to(&b).unwrap();
        assert_eq!(link.target().unwrap(), b);
        assert_eq!(fs::read(link.path()).unwrap(), b"b");
    }

    #[test]
    fn test_replaces_dangling_link() {
        let temp = TempDir::new().unwrap();
        let link = ActiveLink::new(temp.path().join("godot"));
        link.point_to(&temp.path().join("gone")).unwrap();
        assert!(link.exists());

        let real = temp.path().join("real");
        fs::write(&real, b"x").unwrap();
        link.point_to(&real).unwrap();
        assert_eq!(link.target().unwrap(), real);
    }

    #[test]
    fn test_refuses_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("godot");
        fs::create_dir(&path).unwrap();

        let link = ActiveLink::new(&path);
        assert!(link.point_to(temp.path()).is_err());
        assert!(path.is_dir());
    }

    #[test]
    fn test_refuses_regular_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("godot");
        fs::write(&path, b"user's own script").unwrap();
        let target = temp.path().join("real");
        fs::write(&target, b"x").unwrap();

        let link = ActiveLink::new(&path);
        assert!(link.point_to(&target).is_err());
        assert!(link.target().is_none());
        assert_eq!(fs::read(&path).unwrap(), b"user's own script");
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let link = ActiveLink::new(temp.path().join("godot"));
        assert!(!link.remove().unwrap());

        link.point_to(&temp.path().join("anything")).unwrap();
        assert!(link.remove().unwrap());
        assert!(!link.exists());
    }

    #[test]
    fn test_remove_leaves_regular_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("godot");
        fs::write(&path, b"user's own script").unwrap();

        assert!(ActiveLink::new(&path).remove().is_err());
        assert!(path.exists());
    }
}
