// src/install/mod.rs

//! Placing verified releases on disk
//!
//! An install extracts the archive into a scratch directory, moves the single
//! executable payload into `{versions_root}/{version}/`, and repoints the
//! ActiveLink at it.

mod archive;
mod link;
mod store;

pub use archive::extract_zip;
pub use link::ActiveLink;
pub use store::{find_payload, VersionStore};

use crate::context::RunContext;
use crate::error::{Error, Result};
use crate::paths::Layout;
use crate::repository::ReleaseAsset;
use crate::version::ReleaseVersion;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name prefix of the engine executable inside release archives
pub const PAYLOAD_PREFIX: &str = "Godot_v";

/// A version present in the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledVersion {
    pub version: ReleaseVersion,
    pub dir: PathBuf,
    pub executable: PathBuf,
}

/// Look up a complete install of `version`
pub fn find_installed(layout: &Layout, version: &ReleaseVersion) -> Option<InstalledVersion> {
    let executable = VersionStore::new(layout).executable(version)?;
    Some(InstalledVersion {
        version: version.clone(),
        dir: layout.version_dir(version),
        executable,
    })
}

/// Make `installed` the active version
pub fn activate(layout: &Layout, installed: &InstalledVersion) -> Result<()> {
    ActiveLink::new(layout.active_link()).point_to(&installed.executable)
}

/// Install a downloaded, verified archive and activate it
///
/// The version directory is tracked by the run context until the link is in
/// place; if anything fails before that, dropping the context removes it.
pub fn install(ctx: &mut RunContext, asset: &ReleaseAsset, archive: &Path) -> Result<InstalledVersion> {
    let layout = ctx.layout().clone();
    let version_dir = layout.version_dir(&asset.version);

    if version_dir.exists() {
        // Left over from an interrupted run; no usable payload in it
        info!("Replacing incomplete install at {}", version_dir.display());
        fs::remove_dir_all(&version_dir)?;
    }
    fs::create_dir_all(&version_dir).map_err(|e| {
        Error::IoError(format!("Failed to create {}: {e}", version_dir.display()))
    })?;
    ctx.track_partial(&version_dir);

    let scratch = ctx.scratch_dir("extract")?;
    let count = extract_zip(archive, &scratch)?;
    debug!("Extracted {} files from {}", count, asset.filename);

    let payload = find_payload(&scratch).ok_or_else(|| {
        Error::PayloadNotFound(format!(
            "no executable named {PAYLOAD_PREFIX}* in {}",
            asset.filename
        ))
    })?;

    let file_name = payload
        .file_name()
        .ok_or_else(|| Error::PayloadNotFound(payload.display().to_string()))?;
    let executable = version_dir.join(file_name);

    move_file(&payload, &executable)?;
    fs::set_permissions(&executable, fs::Permissions::from_mode(0o755))?;
    info!("Installed {}", executable.display());

    let installed = InstalledVersion {
        version: asset.version.clone(),
        dir: version_dir,
        executable,
    };
    activate(&layout, &installed)?;
    ctx.commit(&installed.dir);

    Ok(installed)
}

/// Rename, or copy and delete when source and destination are on different filesystems
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).map_err(|e| {
        Error::IoError(format!(
            "Failed to copy {} to {}: {e}",
            from.display(),
            to.display()
        ))
    })?;
    let _ = fs::remove_file(from);
    Ok(())
}
