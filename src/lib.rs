// src/lib.rs

//! Godot Installer
//!
//! Installs official Godot engine releases for the current user and keeps a
//! single `godot` symlink pointing at the active one.
//!
//! # Architecture
//!
//! - Pipeline: version → release asset → download → SHA-512 check → install → link
//! - Version store: one directory per version under the user data directory
//! - Single instance: mutating runs hold an exclusive file lock for their lifetime
//! - Per-run cleanup: scratch and half-built directories are owned by a [`RunContext`]

pub mod arch;
pub mod context;
mod error;
pub mod hash;
pub mod install;
pub mod integration;
pub mod lock;
pub mod paths;
pub mod pipeline;
pub mod repository;
pub mod verify;
pub mod version;

pub use arch::Architecture;
pub use context::RunContext;
pub use error::{Error, Result};
pub use hash::{HashAlgorithm, Hasher};
pub use install::{ActiveLink, InstalledVersion, VersionStore};
pub use lock::InstanceLock;
pub use paths::Layout;
pub use pipeline::{InstallOutcome, Pipeline};
pub use repository::{ReleaseAsset, ReleaseIndex, Transport};
pub use version::ReleaseVersion;
