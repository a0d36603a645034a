// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Configuration management for the release pipeline

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::version;

/// Main release configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReleaseConfig {
    /// Application identity stamped into installer metadata
    #[serde(default)]
    pub app: AppMeta,

    /// External packaging step settings
    #[serde(default)]
    pub packaging: PackagingConfig,

    /// Installer compiler settings
    #[serde(default)]
    pub installer: InstallerConfig,

    /// Portable archive settings
    #[serde(default)]
    pub portable: PortableConfig,

    /// Optional install-time tasks offered to the end user
    #[serde(default)]
    pub tasks: TasksConfig,

    /// Published-release check settings
    #[serde(default)]
    pub update: UpdateConfig,

    /// Directory receiving the finished artifacts
    #[serde(default = "default_release_dir")]
    pub release_dir: String,

    /// Directories removed before each build
    #[serde(default = "default_clean_dirs")]
    pub clean_dirs: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppMeta {
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Short name embedded in artifact filenames
    #[serde(default = "default_app_slug")]
    pub slug: String,
    #[serde(default = "default_publisher")]
    pub publisher: String,
    #[serde(default = "default_copyright")]
    pub copyright: String,
    #[serde(default = "default_website")]
    pub website: String,
    /// AppUserModelID registered for desktop notifications
    #[serde(default = "default_aumid")]
    pub app_user_model_id: String,
    /// Name of the launched executable inside the staged directory
    #[serde(default = "default_exe_name")]
    pub exe_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PackagingConfig {
    /// Packaging tool invoked to produce the staged application directory
    #[serde(default = "default_packaging_program")]
    pub program: String,
    #[serde(default = "default_packaging_args")]
    pub args: Vec<String>,
    /// Directory the packaging tool writes into
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,
    /// Name of the staged application directory under dist
    #[serde(default = "default_app_slug")]
    pub staged_dir: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InstallerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Installer compiler program (e.g. ISCC.exe)
    #[serde(default = "default_compiler")]
    pub compiler: String,
    #[serde(default)]
    pub compiler_args: Vec<String>,
    /// Filename the rendered descriptor is written to
    #[serde(default = "default_script_name")]
    pub script_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PortableConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// "zip" or "tar.gz"
    #[serde(default = "default_portable_format")]
    pub format: String,
}

/// One optional task shown during interactive installation
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaskConfig {
    #[serde(default = "default_true")]
    pub offered: bool,
    /// Selected by default in the installer UI
    #[serde(default)]
    pub checked: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TasksConfig {
    #[serde(default)]
    pub desktop_icon: TaskConfig,
    #[serde(default)]
    pub run_at_startup: TaskConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpdateConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_github_repo")]
    pub github_repo: String,
}

// Default value functions
fn default_true() -> bool { true }
fn default_release_dir() -> String { "release".to_string() }
fn default_clean_dirs() -> Vec<String> {
    vec!["build".to_string(), "dist".to_string()]
}
fn default_app_name() -> String { version::APP_NAME.to_string() }
fn default_app_slug() -> String { version::APP_SLUG.to_string() }
fn default_publisher() -> String { version::APP_PUBLISHER.to_string() }
fn default_copyright() -> String { version::APP_COPYRIGHT.to_string() }
fn default_website() -> String { version::APP_WEBSITE.to_string() }
fn default_aumid() -> String { version::APP_USER_MODEL_ID.to_string() }
fn default_exe_name() -> String { format!("{}.exe", version::APP_SLUG) }
fn default_packaging_program() -> String { "pyinstaller".to_string() }
fn default_packaging_args() -> Vec<String> {
    vec![
        "build_exe.spec".to_string(),
        "--clean".to_string(),
        "--noconfirm".to_string(),
    ]
}
fn default_dist_dir() -> String { "dist".to_string() }
fn default_compiler() -> String { "ISCC.exe".to_string() }
fn default_script_name() -> String { "installer.iss".to_string() }
fn default_portable_format() -> String { "zip".to_string() }
fn default_github_repo() -> String { version::GITHUB_REPO.to_string() }

impl Default for AppMeta {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            slug: default_app_slug(),
            publisher: default_publisher(),
            copyright: default_copyright(),
            website: default_website(),
            app_user_model_id: default_aumid(),
            exe_name: default_exe_name(),
        }
    }
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            program: default_packaging_program(),
            args: default_packaging_args(),
            dist_dir: default_dist_dir(),
            staged_dir: default_app_slug(),
        }
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            compiler: default_compiler(),
            compiler_args: Vec::new(),
            script_name: default_script_name(),
        }
    }
}

impl Default for PortableConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            format: default_portable_format(),
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            offered: true,
            checked: false,
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            github_repo: default_github_repo(),
        }
    }
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            app: AppMeta::default(),
            packaging: PackagingConfig::default(),
            installer: InstallerConfig::default(),
            portable: PortableConfig::default(),
            tasks: TasksConfig::default(),
            update: UpdateConfig::default(),
            release_dir: default_release_dir(),
            clean_dirs: default_clean_dirs(),
        }
    }
}

impl ReleaseConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::ReleaseError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_app_identity() {
        let config = ReleaseConfig::default();
        assert_eq!(config.app.name, version::APP_NAME);
        assert_eq!(config.app.slug, version::APP_SLUG);
        assert_eq!(config.release_dir, "release");
        assert!(config.clean_dirs.contains(&"dist".to_string()));
    }

    #[test]
    fn tasks_default_to_unchecked() {
        let tasks = TasksConfig::default();
        assert!(tasks.desktop_icon.offered);
        assert!(!tasks.desktop_icon.checked);
        assert!(!tasks.run_at_startup.checked);
    }

    #[test]
    fn load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReleaseConfig::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config.packaging.dist_dir, "dist");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.json");

        let mut config = ReleaseConfig::default();
        config.portable.format = "tar.gz".to_string();
        config.save(&path).unwrap();

        let loaded = ReleaseConfig::load(&path).unwrap();
        assert_eq!(loaded.portable.format, "tar.gz");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("release.json");
        std::fs::write(&path, r#"{"release_dir": "out"}"#).unwrap();

        let config = ReleaseConfig::load(&path).unwrap();
        assert_eq!(config.release_dir, "out");
        assert_eq!(config.installer.script_name, "installer.iss");
    }
}
