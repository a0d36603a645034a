// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Removal of stale build output before a fresh packaging run

use std::path::Path;
use tracing::{debug, info};

use crate::{ReleaseConfig, Result};

/// Remove the configured build directories under `root`.
///
/// Directories that do not exist are skipped silently; a build that was
/// never run is not an error. Returns the directories actually removed.
pub fn clean_build(root: &Path, config: &ReleaseConfig) -> Result<Vec<String>> {
    info!("Cleaning previous builds...");

    let mut removed = Vec::new();
    for name in &config.clean_dirs {
        let dir = root.join(name);
        if dir.is_dir() {
            std::fs::remove_dir_all(&dir)?;
            info!("Removed: {}/", name);
            removed.push(name.clone());
        } else {
            debug!("Nothing to clean at {:?}", dir);
        }
    }

    Ok(removed)
}
