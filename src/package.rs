// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! The external packaging step
//!
//! Bundles the application and its runtime into a standalone directory
//! under dist. The tool itself is external; this module spawns it, waits,
//! and verifies it actually produced an executable.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

use crate::{ReleaseConfig, ReleaseError, Result};

/// Spawn one pipeline step and map a non-zero exit to an error.
///
/// Child stdio is inherited so tool output lands on the user's console,
/// matching the interactive build flow.
pub fn run_step(step: &str, cmd: &mut Command) -> Result<()> {
    info!("{}...", step);

    let status = cmd.status().map_err(|e| {
        ReleaseError::Prerequisite(format!("{}: failed to spawn: {}", step, e))
    })?;

    if !status.success() {
        return Err(ReleaseError::CommandFailed {
            step: step.to_string(),
            code: status.code(),
        });
    }

    info!("{} completed successfully", step);
    Ok(())
}

/// Run the packaging tool and verify its output.
pub fn build_app(root: &Path, config: &ReleaseConfig) -> Result<PathBuf> {
    let mut cmd = Command::new(&config.packaging.program);
    cmd.args(&config.packaging.args).current_dir(root);

    run_step("Building application with packaging tool", &mut cmd)?;

    let exe = verify_dist(&root.join(&config.packaging.dist_dir))?;
    info!("Executable created: {}", exe.display());
    info!("Executable size: {:.2} MB", file_size_mb(&exe)?);

    Ok(exe)
}

/// Find the first executable the packaging tool produced under dist.
///
/// The tool claims success via its exit code alone, so the directory is
/// scanned as an independent check. Windows builds stage `.exe` files;
/// on unix an extensionless binary with an executable bit also counts.
pub fn verify_dist(dist_dir: &Path) -> Result<PathBuf> {
    let pattern = format!("{}/**/*.exe", dist_dir.display());
    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| ReleaseError::Verify(format!("bad dist pattern: {}", e)))?
        .filter_map(|entry| entry.ok())
        .collect();
    matches.sort();

    if let Some(exe) = matches.into_iter().next() {
        return Ok(exe);
    }

    #[cfg(unix)]
    if dist_dir.is_dir() {
        if let Some(exe) = find_unix_executable(dist_dir)? {
            return Ok(exe);
        }
    }

    Err(ReleaseError::Verify(format!(
        "no executable found under {}",
        dist_dir.display()
    )))
}

/// First file under `dir` with an executable permission bit
#[cfg(unix)]
fn find_unix_executable(dir: &Path) -> Result<Option<PathBuf>> {
    use std::os::unix::fs::PermissionsExt;

    let mut entries: Vec<_> = std::fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_unix_executable(&path)? {
                return Ok(Some(found));
            }
        } else if std::fs::metadata(&path)?.permissions().mode() & 0o111 != 0 {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// File size in MiB for progress reporting
pub fn file_size_mb(path: &Path) -> Result<f64> {
    let len = std::fs::metadata(path)?.len();
    Ok(len as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_dist_finds_nested_exe() {
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("SmartFileOrganizer");
        std::fs::create_dir_all(&staged).unwrap();
        std::fs::write(staged.join("SmartFileOrganizer.exe"), b"MZ").unwrap();

        let exe = verify_dist(dir.path()).unwrap();
        assert!(exe.ends_with("SmartFileOrganizer/SmartFileOrganizer.exe"));
    }

    #[test]
    fn verify_empty_dist_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_dist(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::Verify(_)));
    }

    #[cfg(unix)]
    #[test]
    fn verify_accepts_unix_binary_without_exe_suffix() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("SmartFileOrganizer");
        std::fs::create_dir_all(&staged).unwrap();
        let binary = staged.join("SmartFileOrganizer");
        std::fs::write(&binary, b"\x7fELF fake").unwrap();
        std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755)).unwrap();

        let exe = verify_dist(dir.path()).unwrap();
        assert_eq!(exe, binary);
    }

    #[cfg(unix)]
    #[test]
    fn verify_ignores_non_executable_files() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("SmartFileOrganizer");
        std::fs::create_dir_all(&staged).unwrap();
        let data = staged.join("resources.pak");
        std::fs::write(&data, b"assets").unwrap();
        std::fs::set_permissions(&data, std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = verify_dist(dir.path()).unwrap_err();
        assert!(matches!(err, ReleaseError::Verify(_)));
    }

    #[test]
    fn missing_packaging_tool_halts_without_dist_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ReleaseConfig::default();
        config.packaging.program = "definitely-not-a-real-tool-sfo".to_string();

        assert!(build_app(dir.path(), &config).is_err());
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn size_report_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.exe");
        std::fs::write(&path, vec![0u8; 1024 * 1024]).unwrap();
        let mb = file_size_mb(&path).unwrap();
        assert!((mb - 1.0).abs() < 0.01);
    }
}
