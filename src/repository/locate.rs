// src/repository/locate.rs

//! Asset lookup for a version and architecture

use super::index::{Release, ReleaseIndex};
use crate::arch::Architecture;
use crate::error::{Error, Result};
use crate::version::ReleaseVersion;
use tracing::{debug, info, warn};

/// A downloadable engine archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub version: ReleaseVersion,
    /// Architecture of the asset, which may be the fallback of the one requested
    pub architecture: Architecture,
    pub download_url: String,
    pub filename: String,
}

/// File name upstream uses for a Linux build
pub fn asset_filename(version: &ReleaseVersion, arch: Architecture) -> String {
    format!("Godot_v{}-stable_linux.{}.zip", version, arch.tag())
}

/// Find the asset for `(version, arch)` in the release tagged `{version}-stable`
///
/// The first asset whose download URL ends in the expected file name wins.
/// When nothing matches, 32-bit architectures get one retry with their 64-bit
/// counterpart's name.
pub fn locate(
    index: &dyn ReleaseIndex,
    version: &ReleaseVersion,
    arch: Architecture,
) -> Result<ReleaseAsset> {
    let not_found = || Error::AssetNotFound {
        version: version.to_string(),
        arch: arch.to_string(),
    };

    let tag = version.tag();
    let release = index.by_tag(&tag).map_err(|e| {
        warn!("Could not fetch release {}: {}", tag, e);
        not_found()
    })?;
    debug!("Release {} has {} assets", release.tag_name, release.assets.len());

    if let Some(asset) = find_asset(&release, version, arch) {
        return Ok(asset);
    }

    let Some(fallback) = arch.fallback() else {
        return Err(not_found());
    };

    info!(
        "No {} build published for {}, trying {}",
        arch, version, fallback
    );
    find_asset(&release, version, fallback).ok_or_else(not_found)
}

fn find_asset(
    release: &Release,
    version: &ReleaseVersion,
    arch: Architecture,
) -> Option<ReleaseAsset> {
    let filename = asset_filename(version, arch);

    release
        .assets
        .iter()
        .find(|asset| {
            asset
                .browser_download_url
                .rsplit('/')
                .next()
                .is_some_and(|last| last == filename)
        })
        .map(|asset| {
            info!("Found asset {}", asset.browser_download_url);
            ReleaseAsset {
                version: version.clone(),
                architecture: arch,
                download_url: asset.browser_download_url.clone(),
                filename,
            }
        })
}
