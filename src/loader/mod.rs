//! Raw data loading.
//!
//! This module resolves a source argument (filesystem path or HTTP URL)
//! to the raw delimited text. It is the only asynchronous boundary in
//! the pipeline; the parser and every query downstream are synchronous
//! and never touch I/O.

use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Fetch the raw transfer table from a path or URL.
pub async fn fetch_source(source: &str) -> Result<String> {
    if is_url(source) {
        fetch_url(source).await
    } else {
        read_file(Path::new(source))
    }
}

/// Whether the source should be fetched over HTTP.
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch_url(url: &str) -> Result<String> {
    info!("Fetching transfer data from: {}", url);

    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("Fetching {} returned HTTP {}", url, status);
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?;

    debug!("Fetched {} bytes", text.len());
    Ok(text)
}

fn read_file(path: &Path) -> Result<String> {
    info!("Reading transfer data from: {}", path.display());

    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))
}
