// src/repository/client.rs

//! HTTP client for the release host
//!
//! Wraps a blocking reqwest client. Pipeline stages depend on the
//! [`Transport`] trait rather than on reqwest directly so they can run against
//! canned responses in tests.

use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client, Response};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;

/// Per-attempt network timeout (connect, and whole request for small bodies)
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(15);

/// Upper bound for a single asset download once connected
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(600);

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// User agent sent with every request; the GitHub API rejects requests without one
const USER_AGENT: &str = concat!("godot-installer/", env!("CARGO_PKG_VERSION"));

/// Minimal HTTP surface used by the pipeline
///
/// Both methods make exactly one request. Retrying is the caller's decision.
pub trait Transport {
    /// GET a small text body (JSON, checksum manifests)
    fn get_text(&self, url: &str) -> Result<String>;

    /// GET a body and stream it into `out`, returning the number of bytes written
    fn download(&self, url: &str, out: &mut dyn Write) -> Result<u64>;
}

/// reqwest-backed [`Transport`]
pub struct HttpClient {
    client: Client,
    show_progress: bool,
}

impl HttpClient {
    /// Create a new client
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(NETWORK_TIMEOUT)
            .timeout(DOWNLOAD_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            show_progress: false,
        })
    }

    /// Draw a progress bar while downloading
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn send(&self, url: &str, timeout: Duration) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json, */*")
            .timeout(timeout)
            .send()
            .map_err(|e| Error::Transport(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

impl Transport for HttpClient {
    fn get_text(&self, url: &str) -> Result<String> {
        self.send(url, NETWORK_TIMEOUT)?
            .text()
            .map_err(|e| Error::Transport(format!("Failed to read response from {url}: {e}")))
    }

    fn download(&self, url: &str, out: &mut dyn Write) -> Result<u64> {
        let response = self.send(url, DOWNLOAD_TIMEOUT)?;
        let total_size = response.content_length().unwrap_or(0);

        let progress = (self.show_progress && total_size > 0).then(|| {
            let name = url.rsplit('/').next().unwrap_or(url).to_string();
            create_progress_bar(total_size, &name)
        });

        let result = stream_response(response, out, progress.as_ref());

        if let Some(pb) = &progress {
            match &result {
                Ok(_) => pb.finish_and_clear(),
                Err(_) => pb.abandon(),
            }
        }

        result
    }
}

/// Stream an HTTP response to a writer, never buffering the whole body
fn stream_response(
    mut response: Response,
    out: &mut dyn Write,
    progress: Option<&ProgressBar>,
) -> Result<u64> {
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::Transport(format!("Failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        out.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

        downloaded += bytes_read as u64;

        if let Some(pb) = progress {
            pb.set_position(downloaded);
        }
    }

    out.flush()
        .map_err(|e| Error::IoError(format!("Failed to flush data: {e}")))?;

    Ok(downloaded)
}

fn create_progress_bar(size: u64, name: &str) -> ProgressBar {
    let pb = ProgressBar::new(size);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(name.to_string());
    pb
}
