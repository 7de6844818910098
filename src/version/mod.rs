// src/version/mod.rs

//! Godot release versions
//!
//! Versions are `major.minor[.patch]`. A version without a patch component
//! refers to the release tagged exactly `{major}.{minor}-stable`, which is how
//! upstream tags the first release of a minor series.

use crate::error::{Error, Result};
use crate::repository::ReleaseIndex;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Suffix upstream appends to every stable release tag
pub const STABLE_SUFFIX: &str = "-stable";

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.[0-9]+(\.[0-9]+)?$").expect("version pattern is valid")
});

static TAG_VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+\.[0-9]+(?:\.[0-9]+)?)").expect("tag pattern is valid")
});

/// A validated release version
///
/// The original spelling is preserved (`4.3` stays `4.3`, never `4.3.0`)
/// because it is embedded verbatim in tags and asset names. Components are
/// kept as digit strings, so arbitrarily long numbers are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseVersion {
    raw: String,
}

impl ReleaseVersion {
    /// Parse and validate a version string
    pub fn parse(s: &str) -> Result<Self> {
        if !VERSION_PATTERN.is_match(s) {
            return Err(Error::InvalidVersionFormat(s.to_string()));
        }
        Ok(Self { raw: s.to_string() })
    }

    /// Extract the version from a release tag such as `4.3-stable`
    pub fn from_tag(tag: &str) -> Option<Self> {
        let caps = TAG_VERSION_PATTERN.captures(tag)?;
        Self::parse(caps.get(1)?.as_str()).ok()
    }

    /// Release tag for this version
    pub fn tag(&self) -> String {
        format!("{}{}", self.raw, STABLE_SUFFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether a patch component was given
    pub fn has_patch(&self) -> bool {
        self.components().count() == 3
    }

    fn components(&self) -> impl Iterator<Item = &str> {
        self.raw.split('.')
    }
}

/// Compare two ASCII digit strings by numeric value
fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ReleaseVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        // A missing patch counts as 0; 4.3 (the .0 release) sorts before 4.3.0
        let mut ours = self.components();
        let mut theirs = other.components();
        for _ in 0..3 {
            let ord = cmp_numeric(ours.next().unwrap_or("0"), theirs.next().unwrap_or("0"));
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.has_patch()
            .cmp(&other.has_patch())
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Determine the concrete version to install
///
/// An explicit request is validated exactly as given but not checked for
/// existence; that is left to the release locator. Without a request (or with
/// an empty one) the latest published release is used.
pub fn resolve(index: &dyn ReleaseIndex, requested: Option<&str>) -> Result<ReleaseVersion> {
    match requested.filter(|s| !s.is_empty()) {
        Some(requested) => {
            let version = ReleaseVersion::parse(requested)?;
            debug!("Using requested version {}", version);
            Ok(version)
        }
        None => {
            let release = index
                .latest()
                .map_err(|e| Error::NoReleaseFound(format!("release index unavailable: {e}")))?;

            let version = ReleaseVersion::from_tag(&release.tag_name).ok_or_else(|| {
                Error::NoReleaseFound(format!(
                    "latest release tag '{}' carries no version",
                    release.tag_name
                ))
            })?;

            info!("Latest published version is {}", version);
            Ok(version)
        }
    }
}
