//! Fetch functions - retrieve raw reference CSVs from files, URLs or ZIP bundles

use crate::reference::types::RawData;
use crate::reference::utils::{extract_csv_from_zip, http_get};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where a reference CSV lives
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Url(String),
    File(PathBuf),
    /// Member of a ZIP bundle; `None` takes the first CSV in the archive
    ZipMember(PathBuf, Option<String>),
}

impl Source {
    /// `https://...`, `path/to/file.csv`, `bundle.zip` or `bundle.zip#cities.csv`
    pub fn parse(spec: &str) -> Source {
        let spec = spec.trim();
        if spec.starts_with("http://") || spec.starts_with("https://") {
            return Source::Url(spec.to_string());
        }
        if let Some((archive, member)) = spec.split_once('#') {
            if archive.ends_with(".zip") {
                return Source::ZipMember(PathBuf::from(archive), Some(member.to_string()));
            }
        }
        if spec.ends_with(".zip") {
            return Source::ZipMember(PathBuf::from(spec), None);
        }
        Source::File(PathBuf::from(spec))
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Fetch one reference CSV
pub async fn fetch_source(source: &Source, temp_dir: &Path) -> Result<RawData> {
    match source {
        Source::Url(url) => {
            info!("Fetching reference data from {}", url);
            let bytes = http_get(url).await?;
            Ok(RawData::Bytes(bytes))
        }
        Source::File(path) => {
            info!("Reading reference data from {:?}", path);
            if !path.exists() {
                return Err(anyhow::anyhow!("Reference file {:?} does not exist", path));
            }
            Ok(RawData::File(path.clone()))
        }
        Source::ZipMember(archive, member) => {
            fs::create_dir_all(temp_dir)
                .with_context(|| format!("Cannot create temp dir {:?}", temp_dir))?;

            // Work on a copy so extraction never writes next to the original
            let file_name = archive
                .file_name()
                .context("ZIP source has no file name")?;
            let local_zip = temp_dir.join(file_name);
            if is_same_file(archive, &local_zip) {
                // fs::copy truncates its destination, which would wipe the archive
                debug!("ZIP source {:?} already in temp dir, extracting in place", archive);
            } else {
                fs::copy(archive, &local_zip)
                    .with_context(|| format!("Cannot copy {:?} to {:?}", archive, local_zip))?;
            }

            let csv_path = extract_csv_from_zip(&local_zip, member.as_deref())?;
            Ok(RawData::File(csv_path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("https://example.org/cities.csv"),
            Source::Url("https://example.org/cities.csv".to_string())
        );
        assert_eq!(
            Source::parse("data/cities.csv"),
            Source::File(PathBuf::from("data/cities.csv"))
        );
        assert_eq!(
            Source::parse("data/reference.zip#localities.csv"),
            Source::ZipMember(
                PathBuf::from("data/reference.zip"),
                Some("localities.csv".to_string())
            )
        );
        assert_eq!(
            Source::parse("reference.zip"),
            Source::ZipMember(PathBuf::from("reference.zip"), None)
        );
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("cities.csv");
        fs::write(&path, "name,state\n").unwrap();

        let raw = fetch_source(&Source::File(path.clone()), temp.path()).await.unwrap();
        match raw {
            RawData::File(p) => assert_eq!(p, path),
            _ => panic!("Expected File variant"),
        }

        let missing = Source::File(temp.path().join("nope.csv"));
        assert!(fetch_source(&missing, temp.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_zip_member() {
        let source_dir = tempdir().unwrap();
        let work_dir = tempdir().unwrap();
        let zip_path = source_dir.path().join("reference.zip");

        {
            let file = fs::File::create(&zip_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer
                .start_file("multipliers.csv", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"factor_type,factor_value,multiplier\n").unwrap();
            writer.finish().unwrap();
        }

        let source = Source::ZipMember(zip_path, Some("multipliers.csv".to_string()));
        let raw = fetch_source(&source, work_dir.path()).await.unwrap();
        match raw {
            RawData::File(path) => {
                assert!(path.starts_with(work_dir.path()));
                assert!(path.exists());
            }
            _ => panic!("Expected File variant"),
        }
    }

    #[tokio::test]
    async fn test_fetch_zip_already_in_temp_dir() {
        let work_dir = tempdir().unwrap();
        let zip_path = work_dir.path().join("reference.zip");

        {
            let file = fs::File::create(&zip_path).unwrap();
            let mut writer = zip::ZipWriter::new(file);
            writer
                .start_file("cities.csv", zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(b"name,state,base_price_per_sqft\n").unwrap();
            writer.finish().unwrap();
        }
        let size_before = fs::metadata(&zip_path).unwrap().len();

        let source = Source::ZipMember(zip_path.clone(), None);
        let raw = fetch_source(&source, work_dir.path()).await.unwrap();

        assert_eq!(fs::metadata(&zip_path).unwrap().len(), size_before);
        match raw {
            RawData::File(path) => {
                assert_eq!(
                    fs::read_to_string(path).unwrap(),
                    "name,state,base_price_per_sqft\n"
                );
            }
            _ => panic!("Expected File variant"),
        }

        // a second import from the same place still works
        assert!(fetch_source(&source, work_dir.path()).await.is_ok());
    }

    #[tokio::test]
    #[ignore] // Ignore by default since it hits the network
    async fn test_fetch_url() {
        let temp = tempdir().unwrap();
        let source = Source::Url("https://example.com/".to_string());
        let raw = fetch_source(&source, temp.path()).await;
        assert!(raw.is_ok());
    }
}
