// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Portable archive creation
//!
//! Packs the staged application directory into a version-stamped archive
//! so users can run the app without installing it.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;

use crate::package::file_size_mb;
use crate::{ReleaseConfig, ReleaseError, Result};

/// Portable artifact filename for a given version and format
pub fn portable_filename(slug: &str, version: &str, format: &str) -> String {
    format!("{}_Portable_v{}.{}", slug, version, format)
}

/// Create the portable archive from the staged application directory.
///
/// A missing staged directory is a warning and a skip, not a failure; the
/// installer artifact is the primary deliverable.
pub fn create_portable(root: &Path, config: &ReleaseConfig, version: &str) -> Result<Option<PathBuf>> {
    let staged = root
        .join(&config.packaging.dist_dir)
        .join(&config.packaging.staged_dir);

    if !staged.is_dir() {
        warn!("Distribution folder not found at {:?}, skipping portable archive", staged);
        return Ok(None);
    }

    info!("Creating portable archive...");

    let release_dir = root.join(&config.release_dir);
    std::fs::create_dir_all(&release_dir)?;

    let filename = portable_filename(&config.app.slug, version, &config.portable.format);
    let out_path = release_dir.join(&filename);

    match config.portable.format.as_str() {
        "zip" => write_zip(&staged, &config.packaging.staged_dir, &out_path)?,
        "tar.gz" => write_tar_gz(&staged, &config.packaging.staged_dir, &out_path)?,
        other => {
            return Err(ReleaseError::Archive(format!(
                "unsupported portable format '{}'",
                other
            )))
        }
    }

    info!("Portable archive created: {:.2} MB", file_size_mb(&out_path)?);
    Ok(Some(out_path))
}

/// Zip the staged directory, keeping it as the archive's root folder.
fn write_zip(staged: &Path, top_level: &str, out_path: &Path) -> Result<()> {
    let file = File::create(out_path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for entry in walk(staged)? {
        let rel = entry
            .strip_prefix(staged)
            .map_err(|e| ReleaseError::Archive(e.to_string()))?;
        let name = format!("{}/{}", top_level, path_to_archive_name(rel));

        if entry.is_dir() {
            zip.add_directory(format!("{}/", name), options)
                .map_err(|e| ReleaseError::Archive(e.to_string()))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| ReleaseError::Archive(e.to_string()))?;
            let mut src = File::open(&entry)?;
            io::copy(&mut src, &mut zip)?;
        }
    }

    zip.finish().map_err(|e| ReleaseError::Archive(e.to_string()))?;
    Ok(())
}

fn write_tar_gz(staged: &Path, top_level: &str, out_path: &Path) -> Result<()> {
    let file = File::create(out_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    builder
        .append_dir_all(top_level, staged)
        .map_err(|e| ReleaseError::Archive(format!("tar append failed: {}", e)))?;

    let encoder = builder
        .into_inner()
        .map_err(|e| ReleaseError::Archive(format!("tar finish failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| ReleaseError::Archive(format!("gzip finish failed: {}", e)))?;
    Ok(())
}

/// Archive entry names always use forward slashes
fn path_to_archive_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Depth-first walk, directories before their contents
fn walk(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            paths.push(path.clone());
            paths.extend(walk(&path)?);
        } else {
            paths.push(path);
        }
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;

    fn stage_app(root: &Path) {
        let staged = root.join("dist").join("SmartFileOrganizer");
        std::fs::create_dir_all(staged.join("resources")).unwrap();
        std::fs::write(staged.join("SmartFileOrganizer.exe"), b"MZ fake").unwrap();
        std::fs::write(staged.join("resources/icon.png"), b"png").unwrap();
    }

    #[test]
    fn zip_filename_embeds_version_and_contains_tree() {
        let dir = tempfile::tempdir().unwrap();
        stage_app(dir.path());

        let config = ReleaseConfig::default();
        let out = create_portable(dir.path(), &config, "1.5.0")
            .unwrap()
            .expect("archive created");

        assert!(out.ends_with("release/SmartFileOrganizer_Portable_v1.5.0.zip"));

        let file = File::open(&out).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"SmartFileOrganizer/SmartFileOrganizer.exe".to_string()));
        assert!(names.contains(&"SmartFileOrganizer/resources/icon.png".to_string()));
    }

    #[test]
    fn tar_gz_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        stage_app(dir.path());

        let mut config = ReleaseConfig::default();
        config.portable.format = "tar.gz".to_string();
        let out = create_portable(dir.path(), &config, "2.0.0")
            .unwrap()
            .expect("archive created");

        assert!(out.to_string_lossy().ends_with("SmartFileOrganizer_Portable_v2.0.0.tar.gz"));

        let file = File::open(&out).unwrap();
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        let names: Vec<String> = archive
            .entries()
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.path().unwrap().to_string_lossy().to_string())
            .collect();
        assert!(names.iter().any(|n| n.ends_with("SmartFileOrganizer.exe")));
    }

    #[test]
    fn missing_staged_dir_skips_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = create_portable(dir.path(), &ReleaseConfig::default(), "1.0.0").unwrap();
        assert!(out.is_none());
        assert!(!dir.path().join("release").exists() || std::fs::read_dir(dir.path().join("release")).unwrap().next().is_none());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        stage_app(dir.path());

        let mut config = ReleaseConfig::default();
        config.portable.format = "7z".to_string();
        let err = create_portable(dir.path(), &config, "1.0.0").unwrap_err();
        assert!(matches!(err, ReleaseError::Archive(_)));
    }
}
