//! Utility functions for common operations

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::Client;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Download a file via HTTP
pub async fn http_get(url: &str) -> Result<Bytes> {
    info!("Downloading from {}", url);
    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(anyhow::anyhow!("HTTP request failed: {}", status));
    }

    let bytes = response.bytes().await?;
    info!("Downloaded {} bytes", bytes.len());
    Ok(bytes)
}

/// Extract a CSV from a ZIP archive: the named member, or the first CSV found
pub fn extract_csv_from_zip(zip_path: &Path, member: Option<&str>) -> Result<PathBuf> {
    info!("Extracting CSV from {:?}", zip_path);

    let file = fs::File::open(zip_path)
        .with_context(|| format!("Cannot open ZIP archive {:?}", zip_path))?;
    let mut archive = zip::ZipArchive::new(file)?;

    let output_dir = zip_path
        .parent()
        .context("ZIP path has no parent directory")?;

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let filename = file.name().to_string();

        let wanted = match member {
            Some(name) => filename == name || filename.ends_with(&format!("/{}", name)),
            None => filename.ends_with(".csv"),
        };
        if !wanted {
            continue;
        }

        info!("Found CSV file: {}", filename);

        // Flatten any directory structure inside the archive
        let basename = Path::new(&filename)
            .file_name()
            .context("ZIP member has no file name")?;
        let output_path = output_dir.join(basename);

        let mut output_file = fs::File::create(&output_path)?;
        io::copy(&mut file, &mut output_file)?;

        info!("Extracted to {:?}", output_path);
        return Ok(output_path);
    }

    match member {
        Some(name) => Err(anyhow::anyhow!("{} not found in ZIP archive", name)),
        None => Err(anyhow::anyhow!("No CSV file found in ZIP archive")),
    }
}

/// Parse a price or multiplier cell, tolerating currency symbols and separators
pub fn parse_number(raw: &str) -> Option<f64> {
    let clean: String = raw
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    clean.trim().parse::<f64>().ok()
}

/// Empty or whitespace-only cells become None
pub fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
