// src/repository/index.rs

//! Typed access to the release index
//!
//! The index is the GitHub releases API of the engine repository. Responses
//! are deserialized into [`Release`] records; only the fields the installer
//! reads are modelled.

use super::client::Transport;
use crate::error::{Error, Result};
use crate::version::{ReleaseVersion, STABLE_SUFFIX};
use serde::Deserialize;
use tracing::{debug, info};

/// GitHub API root for the engine's releases
pub const RELEASES_API_URL: &str = "https://api.github.com/repos/godotengine/godot/releases";

/// Root for release asset downloads
pub const RELEASES_DOWNLOAD_URL: &str = "https://github.com/godotengine/godot/releases/download";

/// Name of the per-release checksum manifest asset
pub const CHECKSUM_MANIFEST: &str = "SHA512-SUMS.txt";

/// Application icon on the raw-content host
pub const ICON_URL: &str = "https://raw.githubusercontent.com/godotengine/godot/master/icon.svg";

/// Releases requested per index page
const PAGE_SIZE: u32 = 100;

/// Hard stop for pagination
const MAX_PAGES: u32 = 20;

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAssetEntry>,
}

/// A downloadable file attached to a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAssetEntry {
    pub name: String,
    pub browser_download_url: String,
}

/// Read access to published releases
pub trait ReleaseIndex {
    /// Most recent published release
    fn latest(&self) -> Result<Release>;

    /// Release for an exact tag (e.g. `4.3-stable`)
    fn by_tag(&self, tag: &str) -> Result<Release>;

    /// One page of releases, newest first; pages start at 1
    fn page(&self, page: u32, per_page: u32) -> Result<Vec<Release>>;

    /// Raw checksum manifest published with a release
    fn checksum_manifest(&self, version: &ReleaseVersion) -> Result<String>;
}

/// [`ReleaseIndex`] backed by the GitHub releases API
pub struct GithubReleases<'a> {
    transport: &'a dyn Transport,
    api_url: String,
    download_url: String,
}

impl<'a> GithubReleases<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            transport,
            api_url: RELEASES_API_URL.to_string(),
            download_url: RELEASES_DOWNLOAD_URL.to_string(),
        }
    }

    /// Point the index at different endpoints (mirrors of the API shape, tests)
    pub fn with_endpoints(mut self, api_url: &str, download_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self.download_url = download_url.trim_end_matches('/').to_string();
        self
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let body = self.transport.get_text(url)?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Invalid release index response from {url}: {e}")))
    }
}

impl ReleaseIndex for GithubReleases<'_> {
    fn latest(&self) -> Result<Release> {
        self.get_json(&format!("{}/latest", self.api_url))
    }

    fn by_tag(&self, tag: &str) -> Result<Release> {
        self.get_json(&format!("{}/tags/{}", self.api_url, tag))
    }

    fn page(&self, page: u32, per_page: u32) -> Result<Vec<Release>> {
        self.get_json(&format!(
            "{}?per_page={}&page={}",
            self.api_url, per_page, page
        ))
    }

    fn checksum_manifest(&self, version: &ReleaseVersion) -> Result<String> {
        let url = format!("{}/{}/{}", self.download_url, version.tag(), CHECKSUM_MANIFEST);
        debug!("Fetching checksum manifest from {}", url);
        self.transport.get_text(&url)
    }
}

/// All published stable versions, newest first
pub fn list_versions(index: &dyn ReleaseIndex) -> Result<Vec<ReleaseVersion>> {
    let mut versions = Vec::new();

    for page in 1..=MAX_PAGES {
        let releases = index.page(page, PAGE_SIZE)?;
        let count = releases.len();

        versions.extend(
            releases
                .iter()
                .filter(|r| r.tag_name.ends_with(STABLE_SUFFIX))
                .filter_map(|r| ReleaseVersion::from_tag(&r.tag_name)),
        );

        if count < PAGE_SIZE as usize {
            break;
        }
    }

    versions.sort_by(|a, b| b.cmp(a));
    versions.dedup();

    info!("Release index lists {} stable versions", versions.len());
    Ok(versions)
}
