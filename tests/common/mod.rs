// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use godot_installer::hash::{hash_bytes, HashAlgorithm};
use godot_installer::repository::GithubReleases;
use godot_installer::{Architecture, Error, Layout, Result, Transport};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Write};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

pub const API_URL: &str = "https://api.test/releases";
pub const DOWNLOAD_URL: &str = "https://dl.test/releases/download";

/// In-memory release host
///
/// Serves canned bodies by exact URL and counts every request, so tests can
/// assert which stages touched the network.
#[derive(Default)]
pub struct FakeHost {
    bodies: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    requests: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.insert(url.into(), body.into());
    }

    /// Make every request for `url` fail at the transport level
    pub fn fail(&mut self, url: impl Into<String>) {
        self.failing.insert(url.into());
    }

    /// Publish `version` with one zip per architecture and a matching manifest
    pub fn publish(&mut self, version: &str, archs: &[Architecture]) {
        let mut assets = Vec::new();
        let mut manifest = String::new();

        for arch in archs {
            let name = asset_name(version, *arch);
            let url = format!("{DOWNLOAD_URL}/{version}-stable/{name}");
            let zip = engine_zip(version, *arch);

            manifest.push_str(&format!("{}  {}\n", hash_bytes(HashAlgorithm::Sha512, &zip), name));
            assets.push(format!(
                r#"{{"name": "{name}", "browser_download_url": "{url}"}}"#
            ));
            self.serve(url, zip);
        }

        let release = format!(
            r#"{{"tag_name": "{version}-stable", "assets": [{}]}}"#,
            assets.join(", ")
        );
        self.serve(format!("{API_URL}/tags/{version}-stable"), release.clone());
        self.serve(format!("{API_URL}/latest"), release);
        self.serve(
            format!("{DOWNLOAD_URL}/{version}-stable/SHA512-SUMS.txt"),
            manifest,
        );
    }

    pub fn index(&self) -> GithubReleases<'_> {
        GithubReleases::new(self).with_endpoints(API_URL, DOWNLOAD_URL)
    }

    /// Number of requests made for URLs ending in `suffix`
    pub fn count(&self, suffix: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|url| url.ends_with(suffix))
            .count()
    }

    fn respond(&self, url: &str) -> Result<&[u8]> {
        self.requests.borrow_mut().push(url.to_string());
        if self.failing.contains(url) {
            return Err(Error::Transport(format!("connection reset fetching {url}")));
        }
        self.bodies
            .get(url)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::Http {
                url: url.to_string(),
                status: 404,
            })
    }
}

impl Transport for FakeHost {
    fn get_text(&self, url: &str) -> Result<String> {
        let body = self.respond(url)?;
        String::from_utf8(body.to_vec()).map_err(|e| Error::Parse(e.to_string()))
    }

    fn download(&self, url: &str, out: &mut dyn Write) -> Result<u64> {
        let body = self.respond(url)?;
        out.write_all(body)?;
        Ok(body.len() as u64)
    }
}

pub fn asset_name(version: &str, arch: Architecture) -> String {
    format!("Godot_v{version}-stable_linux.{}.zip", arch.tag())
}

/// Zip laid out like an upstream Linux release: one executable at the top level
pub fn engine_zip(version: &str, arch: Architecture) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file(
            format!("Godot_v{version}-stable_linux.{}", arch.tag()),
            SimpleFileOptions::default().unix_permissions(0o755),
        )
        .unwrap();
    writer
        .write_all(format!("ELF godot {version} {arch}").as_bytes())
        .unwrap();
    writer.finish().unwrap().into_inner()
}

/// A layout rooted in a fresh temporary directory
///
/// Returns (TempDir, Layout) - keep the TempDir alive to prevent cleanup.
pub fn temp_layout() -> (TempDir, Layout) {
    let temp = tempfile::tempdir().unwrap();
    let layout = Layout::with_root(temp.path());
    (temp, layout)
}
