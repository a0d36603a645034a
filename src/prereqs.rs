// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Prerequisite probes run before any build side effect
//!
//! A missing tool must fail the pipeline before the packaging step gets a
//! chance to touch the filesystem.

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::{ReleaseConfig, ReleaseError, Result};

/// Probe a tool by spawning `<program> --version` with suppressed output.
///
/// Spawn failure means the tool is not installed or not on PATH; a
/// non-zero exit from `--version` is tolerated since some packagers use a
/// different probe flag.
pub fn probe_tool(program: &str) -> Result<()> {
    let status = Command::new(program)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| {
            ReleaseError::Prerequisite(format!("{} not found: {}", program, e))
        })?;

    debug!("{} probe exit: {:?}", program, status.code());
    Ok(())
}

/// Check the installer compiler. An explicit path must exist on disk; a
/// bare program name is probed through PATH like any other tool.
pub fn check_compiler(compiler: &str) -> Result<()> {
    let path = Path::new(compiler);
    if path.components().count() > 1 {
        if path.exists() {
            return Ok(());
        }
        return Err(ReleaseError::Prerequisite(format!(
            "installer compiler not found at {}",
            path.display()
        )));
    }
    probe_tool(compiler)
}

/// Verify every external tool the pipeline will invoke.
///
/// Fail-fast contract: returns the first missing prerequisite without
/// running anything else.
pub fn check_all(config: &ReleaseConfig) -> Result<()> {
    info!("Checking prerequisites...");

    probe_tool(&config.packaging.program)?;
    info!("Packaging tool '{}' found", config.packaging.program);

    if config.installer.enabled {
        check_compiler(&config.installer.compiler)?;
        info!("Installer compiler '{}' found", config.installer.compiler);
    } else {
        debug!("Installer step disabled, skipping compiler check");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_missing_tool_is_prerequisite_error() {
        let err = probe_tool("definitely-not-a-real-tool-sfo").unwrap_err();
        match err {
            ReleaseError::Prerequisite(msg) => {
                assert!(msg.contains("definitely-not-a-real-tool-sfo"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn explicit_compiler_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ISCC.exe");
        let err = check_compiler(&missing.to_string_lossy()).unwrap_err();
        assert!(matches!(err, ReleaseError::Prerequisite(_)));
    }

    #[test]
    fn explicit_compiler_path_accepted_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = dir.path().join("ISCC.exe");
        std::fs::write(&compiler, b"").unwrap();
        check_compiler(&compiler.to_string_lossy()).unwrap();
    }

    #[test]
    fn check_all_fails_before_any_side_effect() {
        let mut config = ReleaseConfig::default();
        config.packaging.program = "definitely-not-a-real-tool-sfo".to_string();
        assert!(check_all(&config).is_err());
    }
}
