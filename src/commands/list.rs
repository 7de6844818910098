// src/commands/list.rs
//! Listing published and installed releases

use anyhow::{Context, Result};
use godot_installer::install::VersionStore;
use godot_installer::repository::{list_versions, GithubReleases, HttpClient};
use godot_installer::{Layout, ReleaseVersion};

/// Print published stable releases, newest first
///
/// Read-only, so no instance lock is taken.
pub fn cmd_list(layout: Layout) -> Result<()> {
    let client = HttpClient::new().context("Failed to create HTTP client")?;
    let index = GithubReleases::new(&client);
    let published = list_versions(&index).context("Failed to list published releases")?;

    let store = VersionStore::new(&layout);
    let installed = store.installed_versions()?;
    let active = store.active_version();

    println!("Available Godot releases:");
    for version in &published {
        println!("{}", format_row(version, &installed, active.as_ref()));
    }

    // Installed builds that are no longer published still deserve a line
    for version in installed.iter().filter(|v| !published.contains(v)) {
        println!("{}", format_row(version, &installed, active.as_ref()));
    }

    Ok(())
}

fn format_row(
    version: &ReleaseVersion,
    installed: &[ReleaseVersion],
    active: Option<&ReleaseVersion>,
) -> String {
    let mut row = format!("  {:<10}", version.as_str());
    if installed.contains(version) {
        row.push_str(" [installed]");
    }
    if active == Some(version) {
        row.push_str(" [active]");
    }
    row.trim_end().to_string()
}
