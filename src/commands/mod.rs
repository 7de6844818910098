// src/commands/mod.rs
//! Command handlers for the Godot installer CLI

mod clean;
mod install;
mod list;
mod uninstall;

pub use clean::cmd_clean;
pub use install::cmd_install;
pub use list::cmd_list;
pub use uninstall::cmd_uninstall;
