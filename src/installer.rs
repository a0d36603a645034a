// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Installer compilation
//!
//! Writes the rendered descriptor and hands it to the external installer
//! compiler with the build version exported in the environment, so the
//! installer's displayed version can never drift from the build.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::descriptor::{self, InstallerDescriptor};
use crate::package::{file_size_mb, run_step};
use crate::{ReleaseConfig, ReleaseError, Result};

/// Write the descriptor script for this build into the workspace root.
pub fn write_descriptor(root: &Path, config: &ReleaseConfig, version: &str) -> Result<PathBuf> {
    let desc = InstallerDescriptor::from_config(config, version);
    let path = root.join(&config.installer.script_name);
    std::fs::write(&path, desc.render())?;
    info!("Installer descriptor written: {}", path.display());
    Ok(path)
}

/// Compile the installer and verify the version-stamped artifact exists.
pub fn build_installer(root: &Path, config: &ReleaseConfig, version: &str) -> Result<PathBuf> {
    let script = write_descriptor(root, config, version)?;

    let mut cmd = Command::new(&config.installer.compiler);
    cmd.args(&config.installer.compiler_args)
        .arg(&script)
        .env(descriptor::VERSION_ENV, version)
        .current_dir(root);

    run_step("Building installer", &mut cmd)?;

    let artifact = root
        .join(&config.release_dir)
        .join(descriptor::installer_filename(&config.app.slug, version));
    if !artifact.exists() {
        return Err(ReleaseError::Verify(format!(
            "installer not found: {}",
            artifact.display()
        )));
    }

    info!("Installer size: {:.2} MB", file_size_mb(&artifact)?);
    info!("Location: {}", artifact.display());
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_lands_at_configured_script_name() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReleaseConfig::default();

        let path = write_descriptor(dir.path(), &config, "1.2.3").unwrap();
        assert!(path.ends_with("installer.iss"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("AppVersion=1.2.3"));
    }

    #[test]
    fn missing_compiler_fails_after_descriptor_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ReleaseConfig::default();
        config.installer.compiler = "definitely-not-a-real-tool-sfo".to_string();

        let err = build_installer(dir.path(), &config, "1.0.0").unwrap_err();
        assert!(matches!(err, ReleaseError::Prerequisite(_)));
        // The descriptor is an input, not a claimed output; it may exist.
        assert!(dir.path().join("installer.iss").exists());
    }
}
