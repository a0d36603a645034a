// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! The build orchestrator: a fixed linear sequence with early exit
//!
//! Order: release dir → prerequisites → clean → packaging step →
//! installer → portable archive → checksums → build journal → summary.
//! The first failing step halts the run; nothing after it executes and
//! no success banner is printed.

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::buildlog::{create_record, BuildLog};
use crate::descriptor::{self, installer_filename};
use crate::portable::portable_filename;
use crate::{checksum, clean, installer, package, portable, prereqs};
use crate::{ReleaseConfig, Result};

/// Flags controlling a single pipeline run
#[derive(Debug, Default, Clone)]
pub struct PipelineOptions {
    /// Version override; falls back to APP_VERSION env, then the default
    pub version: Option<String>,
    pub skip_clean: bool,
    pub skip_prereq_check: bool,
}

/// What a successful run produced
#[derive(Debug)]
pub struct PipelineOutcome {
    pub version: String,
    pub installer: Option<PathBuf>,
    pub portable: Option<PathBuf>,
    pub checksums: Option<PathBuf>,
}

/// Journal location inside the release directory
pub fn build_log_path(root: &Path, config: &ReleaseConfig) -> PathBuf {
    root.join(&config.release_dir).join("builds.jsonl")
}

/// Run the full release pipeline.
///
/// Every run, pass or fail, leaves a record in the build journal.
pub fn run(root: &Path, config: &ReleaseConfig, opts: &PipelineOptions) -> Result<PipelineOutcome> {
    let version = descriptor::resolve_version(opts.version.as_deref())?;
    info!("Building version: {}", version);

    let log = BuildLog::new(build_log_path(root, config));

    match run_steps(root, config, opts, &version) {
        Ok(outcome) => {
            let artifacts: Vec<PathBuf> = [outcome.installer.clone(), outcome.portable.clone()]
                .into_iter()
                .flatten()
                .collect();
            log.append(&create_record(version.clone(), artifacts, true))?;
            print_summary(&outcome, config);
            Ok(outcome)
        }
        Err(e) => {
            // Best effort: a failed run should still be journaled, but
            // journal trouble must not mask the original failure.
            if let Err(log_err) = log.append(&create_record(version, Vec::new(), false)) {
                warn!("Failed to journal build record: {}", log_err);
            }
            Err(e)
        }
    }
}

fn run_steps(
    root: &Path,
    config: &ReleaseConfig,
    opts: &PipelineOptions,
    version: &str,
) -> Result<PipelineOutcome> {
    std::fs::create_dir_all(root.join(&config.release_dir))?;

    if opts.skip_prereq_check {
        warn!("Skipping prerequisite checks");
    } else {
        prereqs::check_all(config)?;
    }

    if opts.skip_clean {
        warn!("Keeping previous build output");
    } else {
        clean::clean_build(root, config)?;
    }

    package::build_app(root, config)?;

    let installer_artifact = if config.installer.enabled {
        Some(installer::build_installer(root, config, version)?)
    } else {
        warn!("Installer step disabled");
        None
    };

    let portable_artifact = if config.portable.enabled {
        portable::create_portable(root, config, version)?
    } else {
        None
    };

    let artifacts: Vec<PathBuf> = [installer_artifact.clone(), portable_artifact.clone()]
        .into_iter()
        .flatten()
        .collect();
    let checksums = if artifacts.is_empty() {
        None
    } else {
        Some(checksum::write_manifest(&root.join(&config.release_dir), &artifacts)?)
    };

    Ok(PipelineOutcome {
        version: version.to_string(),
        installer: installer_artifact,
        portable: portable_artifact,
        checksums,
    })
}

/// Final report with the version-stamped artifact paths and next steps
fn print_summary(outcome: &PipelineOutcome, config: &ReleaseConfig) {
    let version = &outcome.version;

    println!();
    println!("{}", "=".repeat(70));
    println!("  BUILD COMPLETED SUCCESSFULLY");
    println!("{}", "=".repeat(70));
    println!();
    println!("Version: {}", version);
    println!();
    println!("Output files:");
    println!(
        "  Installer: {}/{}",
        config.release_dir,
        installer_filename(&config.app.slug, version)
    );
    println!(
        "  Portable:  {}/{}",
        config.release_dir,
        portable_filename(&config.app.slug, version, &config.portable.format)
    );
    if let Some(ref manifest) = outcome.checksums {
        println!("  Checksums: {}", manifest.display());
    }
    println!();
    println!("Next steps:");
    println!("  1. Test the installer");
    println!("  2. git tag -a v{} -m 'Version {}'", version, version);
    println!("  3. git push origin main && git push origin v{}", version);
    println!("  4. Create the GitHub release and upload both artifacts");
    println!();
}
