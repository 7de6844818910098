// src/commands/install.rs
//! Release installation command

use anyhow::{Context, Result};
use godot_installer::integration;
use godot_installer::repository::{GithubReleases, HttpClient};
use godot_installer::{Architecture, Layout, Pipeline, RunContext};
use tracing::{info, warn};

/// Install `version` (or the latest stable release) and make it active
pub fn cmd_install(layout: Layout, version: Option<&str>) -> Result<()> {
    let mut ctx = RunContext::acquire(layout)?;

    let arch = Architecture::resolve()?;
    info!("Detected architecture: {}", arch);

    let client = HttpClient::new()
        .context("Failed to create HTTP client")?
        .with_progress(true);
    let index = GithubReleases::new(&client);

    let outcome = Pipeline::new(&index, &client).run(&mut ctx, version, arch)?;
    let installed = &outcome.installed;

    integration::write_desktop_entry(ctx.layout())
        .context("Failed to write desktop entry")?;
    if let Err(e) = integration::install_icon(ctx.layout(), &client) {
        warn!("Could not install the Godot icon: {}", e);
    }
    integration::install_self(ctx.layout())
        .context("Failed to copy the installer into the bin directory")?;

    if outcome.fresh {
        println!("Installed Godot {}", installed.version);
    } else {
        println!("Godot {} was already installed", installed.version);
    }
    println!(
        "  {} -> {}",
        ctx.layout().active_link().display(),
        installed.executable.display()
    );

    Ok(())
}
