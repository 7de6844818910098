// src/commands/clean.rs
//! Removal of inactive versions

use anyhow::Result;
use godot_installer::install::VersionStore;
use godot_installer::{Layout, RunContext};

/// Remove every installed version except the one the ActiveLink points at
pub fn cmd_clean(layout: Layout) -> Result<()> {
    let ctx = RunContext::acquire(layout)?;
    let store = VersionStore::new(ctx.layout());

    let removed = store.clean()?;
    if removed.is_empty() {
        println!("Nothing to clean");
    } else {
        println!("Removed {} inactive version(s):", removed.len());
        for version in &removed {
            println!("  {}", version);
        }
    }

    Ok(())
}
