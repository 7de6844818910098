// src/integration.rs

//! Desktop integration
//!
//! Application-menu entry, icon, and a copy of the installer next to the
//! ActiveLink. None of this is needed to run the engine, so the icon download
//! is a single attempt whose failure callers only warn about.

use crate::error::{Error, Result};
use crate::paths::Layout;
use crate::repository::{Transport, ICON_URL};
use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Contents of the `.desktop` file
pub fn desktop_entry_contents(layout: &Layout) -> String {
    format!(
        "[Desktop Entry]\n\
         Name=Godot Engine\n\
         GenericName=Game Engine\n\
         Comment=Multi-platform 2D and 3D game engine\n\
         Exec={} %f\n\
         Icon={}\n\
         Terminal=false\n\
         Type=Application\n\
         MimeType=application/x-godot-project;\n\
         Categories=Development;IDE;\n\
         StartupWMClass=Godot\n",
        layout.active_link().display(),
        layout.icon().display()
    )
}

/// Write the application-menu entry, replacing any previous one
pub fn write_desktop_entry(layout: &Layout) -> Result<PathBuf> {
    let path = layout.desktop_entry();
    write_atomic(&path, desktop_entry_contents(layout).as_bytes(), 0o644)?;
    info!("Wrote desktop entry {}", path.display());
    Ok(path)
}

/// Download the icon unless it is already present
///
/// Returns whether a download happened.
pub fn install_icon(layout: &Layout, transport: &dyn Transport) -> Result<bool> {
    let path = layout.icon();
    if path.exists() {
        debug!("Icon already present at {}", path.display());
        return Ok(false);
    }

    let mut svg = Vec::new();
    transport.download(ICON_URL, &mut svg)?;
    write_atomic(&path, &svg, 0o644)?;
    info!("Installed icon {}", path.display());
    Ok(true)
}

/// Copy the running installer into the executables directory
///
/// Returns whether a copy was made; running from the destination is a no-op.
pub fn install_self(layout: &Layout) -> Result<bool> {
    let current = std::env::current_exe()
        .map_err(|e| Error::IoError(format!("Cannot locate running executable: {e}")))?;
    install_executable(&current, &layout.self_copy())
}

fn install_executable(source: &Path, dest: &Path) -> Result<bool> {
    if let (Ok(a), Ok(b)) = (fs::canonicalize(source), fs::canonicalize(dest)) {
        if a == b {
            return Ok(false);
        }
    }

    let data = fs::read(source)
        .map_err(|e| Error::IoError(format!("Failed to read {}: {e}", source.display())))?;
    write_atomic(dest, &data, 0o755)?;
    info!("Installed {} to {}", source.display(), dest.display());
    Ok(true)
}

/// Remove every integration file; returns the paths that were removed
pub fn remove_integration(layout: &Layout) -> Vec<PathBuf> {
    [layout.desktop_entry(), layout.icon(), layout.self_copy()]
        .into_iter()
        .filter(|path| match fs::remove_file(path) {
            Ok(()) => {
                info!("Removed {}", path.display());
                true
            }
            Err(_) => false,
        })
        .collect()
}

/// Write through a sibling temp file and rename over `path`
///
/// Renaming never touches the old inode, so replacing a running executable
/// does not fail with ETXTBSY.
fn write_atomic(path: &Path, data: &[u8], mode: u32) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::IoError(format!("No parent directory for {}", path.display())))?;
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.as_file()
        .set_permissions(fs::Permissions::from_mode(mode))?;
    tmp.persist(path)
        .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e.error)))?;
    Ok(())
}
