// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Artifact checksums published alongside each release

use std::path::{Path, PathBuf};
use tracing::info;

use crate::{ReleaseError, Result};

/// Name of the checksum manifest written into the release directory
pub const CHECKSUM_FILE: &str = "CHECKSUMS.txt";

/// BLAKE3 digest of a file as lowercase hex
pub fn hash_file(path: &Path) -> Result<String> {
    let data = std::fs::read(path)?;
    let hash = blake3::hash(&data);
    Ok(hash.to_hex().to_string())
}

/// Write the checksum manifest for the given artifacts.
///
/// Lines follow the conventional `<digest>  <filename>` layout, one per
/// artifact, filenames only (the manifest sits next to them).
pub fn write_manifest(release_dir: &Path, artifacts: &[PathBuf]) -> Result<PathBuf> {
    let mut lines = Vec::new();
    for artifact in artifacts {
        let name = artifact
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ReleaseError::Verify(format!("unnamed artifact: {:?}", artifact)))?;
        let digest = hash_file(artifact)?;
        lines.push(format!("{}  {}", digest, name));
    }

    let manifest = release_dir.join(CHECKSUM_FILE);
    std::fs::write(&manifest, lines.join("\n") + "\n")?;
    info!("Checksums written: {}", manifest.display());
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_for_same_content() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.bin");
        let b = dir.path().join("b.bin");
        std::fs::write(&a, b"release payload").unwrap();
        std::fs::write(&b, b"release payload").unwrap();

        assert_eq!(hash_file(&a).unwrap(), hash_file(&b).unwrap());
    }

    #[test]
    fn manifest_lists_every_artifact_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let setup = dir.path().join("SmartFileOrganizer_Setup_v1.0.0.exe");
        let portable = dir.path().join("SmartFileOrganizer_Portable_v1.0.0.zip");
        std::fs::write(&setup, b"installer").unwrap();
        std::fs::write(&portable, b"portable").unwrap();

        let manifest = write_manifest(dir.path(), &[setup, portable]).unwrap();
        let text = std::fs::read_to_string(manifest).unwrap();

        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("SmartFileOrganizer_Setup_v1.0.0.exe"));
        assert!(text.contains("SmartFileOrganizer_Portable_v1.0.0.zip"));
    }
}
