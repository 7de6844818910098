// src/cli/mod.rs
//! CLI definitions for the Godot installer
//!
//! This module contains the command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! - `install` - Install a release (latest stable when no version is given)
//! - `uninstall` - Remove one version, or everything the installer placed
//! - `clean` - Remove every installed version except the active one
//! - `list` - Show published stable releases and what is installed

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "godot-installer")]
#[command(author = "Godot Installer Contributors")]
#[command(version)]
#[command(about = "Install and manage Godot engine releases for the current user", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install a Godot release and make it the active version
    Install {
        /// Release to install, e.g. 4.3 or 4.2.1 (default: latest stable)
        version: Option<String>,
    },

    /// Remove an installed version (all versions and desktop files if omitted)
    #[command(alias = "remove")]
    Uninstall {
        /// Installed version to remove
        version: Option<String>,
    },

    /// Remove every installed version except the active one
    Clean,

    /// List published stable releases, marking installed and active ones
    List,
}
