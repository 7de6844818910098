// src/pipeline.rs

//! The install pipeline
//!
//! version resolution → installed check → asset lookup → download →
//! checksum verification → install → link. Each stage consumes the previous
//! stage's output; the first error ends the run.

use crate::arch::Architecture;
use crate::context::RunContext;
use crate::error::Result;
use crate::install::{self, InstalledVersion};
use crate::repository::{self, Downloader, ReleaseIndex, Transport};
use crate::verify;
use crate::version;
use std::time::Duration;
use tracing::info;

/// Result of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub installed: InstalledVersion,
    /// False when the version was already installed and only relinked
    pub fresh: bool,
}

pub struct Pipeline<'a> {
    index: &'a dyn ReleaseIndex,
    transport: &'a dyn Transport,
    retry_delay: Duration,
}

impl<'a> Pipeline<'a> {
    pub fn new(index: &'a dyn ReleaseIndex, transport: &'a dyn Transport) -> Self {
        Self {
            index,
            transport,
            retry_delay: repository::RETRY_DELAY,
        }
    }

    /// Override the downloader's pause between attempts
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Install `requested` (or the latest release) for `arch`
    pub fn run(
        &self,
        ctx: &mut RunContext,
        requested: Option<&str>,
        arch: Architecture,
    ) -> Result<InstallOutcome> {
        let version = version::resolve(self.index, requested)?;

        if let Some(installed) = install::find_installed(ctx.layout(), &version) {
            info!(
                "Godot {} is already installed at {}",
                version,
                installed.dir.display()
            );
            install::activate(ctx.layout(), &installed)?;
            return Ok(InstallOutcome {
                installed,
                fresh: false,
            });
        }

        let asset = repository::locate(self.index, &version, arch)?;

        let download_dir = ctx.scratch_dir("download")?;
        let archive = Downloader::new(self.transport)
            .with_retry_delay(self.retry_delay)
            .fetch(&asset.download_url, &download_dir)?;

        verify::verify(self.index, &archive, &version, asset.architecture)?;

        let installed = install::install(ctx, &asset, &archive)?;
        Ok(InstallOutcome {
            installed,
            fresh: true,
        })
    }
}
