// src/commands/uninstall.rs
//! Removal of installed versions

use anyhow::{Context, Result};
use godot_installer::install::VersionStore;
use godot_installer::integration;
use godot_installer::{Layout, ReleaseVersion, RunContext};
use tracing::info;

/// Godot's own per-user data, which uninstall never touches
const USER_DATA_DIRS: [&str; 2] = ["~/.local/share/godot", "~/.config/godot"];

/// Remove one installed version, or every version plus the desktop integration
pub fn cmd_uninstall(layout: Layout, version: Option<&str>) -> Result<()> {
    let version = version
        .map(ReleaseVersion::parse)
        .transpose()
        .context("Invalid version argument")?;

    let ctx = RunContext::acquire(layout)?;
    let store = VersionStore::new(ctx.layout());

    store.uninstall(version.as_ref())?;

    let remaining = store.installed_versions()?;
    if remaining.is_empty() {
        let removed = integration::remove_integration(ctx.layout());
        info!("Removed {} integration file(s)", removed.len());
        for dir in USER_DATA_DIRS {
            info!("Godot user data in {} was left in place", dir);
        }
    }

    match version {
        Some(v) => println!("Uninstalled Godot {}", v),
        None => println!("Uninstalled all Godot versions"),
    }
    if !remaining.is_empty() {
        let names: Vec<String> = remaining.iter().map(|v| v.to_string()).collect();
        println!("Still installed: {}", names.join(", "));
    }

    Ok(())
}
