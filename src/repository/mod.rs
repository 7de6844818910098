// src/repository/mod.rs

//! Release host access
//!
//! This module provides functionality for:
//! - Talking to the release host over HTTP (behind the [`Transport`] seam)
//! - Reading the release index into typed records
//! - Locating the asset for a version and architecture
//! - Downloading assets with bounded retries

mod client;
mod download;
mod index;
mod locate;

pub use client::{HttpClient, Transport, NETWORK_TIMEOUT};
pub use download::{filename_from_url, Downloader, MAX_ATTEMPTS, RETRY_DELAY};
pub use index::{
    list_versions, GithubReleases, Release, ReleaseAssetEntry, ReleaseIndex, CHECKSUM_MANIFEST,
    ICON_URL,
};
pub use locate::{asset_filename, locate, ReleaseAsset};
