// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Installer descriptor generation
//!
//! Builds the declarative script consumed by the external installer
//! compiler. The descriptor itself carries no hard-coded version: every
//! metadata field and the output filename are substituted from the single
//! version value supplied for the build.

use serde::Serialize;
use std::fmt::Write as _;

use crate::{ReleaseConfig, Result, Version};

/// Environment variable carrying the build version into the
/// installer-compile step
pub const VERSION_ENV: &str = "APP_VERSION";

/// One optional task offered during interactive installation
#[derive(Debug, Clone, Serialize)]
pub struct TaskEntry {
    /// Identifier referenced by guarded entries
    pub name: String,
    pub description: String,
    pub group: String,
    /// Selected by default in the installer UI
    pub checked: bool,
}

/// One post-install registry value under the current user's hive.
///
/// Writing a plain string value is idempotent: re-running the installer
/// simply rewrites the same data.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryValue {
    pub root: String,
    pub subkey: String,
    pub value_name: String,
    pub value_data: String,
}

/// Declarative model of the generated installer
#[derive(Debug, Clone, Serialize)]
pub struct InstallerDescriptor {
    pub app_name: String,
    pub version: String,
    pub publisher: String,
    pub website: String,
    pub copyright: String,
    /// Directory tree of build output packaged into the installer
    pub source_dir: String,
    pub output_dir: String,
    pub output_base_filename: String,
    pub exe_name: String,
    pub tasks: Vec<TaskEntry>,
    pub registry: RegistryValue,
}

/// Resolve the build version: explicit override first, then the
/// `APP_VERSION` environment variable, then the compiled-in default.
/// Whatever wins must parse as a dotted numeric version.
pub fn resolve_version(override_version: Option<&str>) -> Result<String> {
    let raw = match override_version {
        Some(v) => v.to_string(),
        None => std::env::var(VERSION_ENV)
            .unwrap_or_else(|_| crate::version::APP_VERSION.to_string()),
    };
    let parsed: Version = raw.parse()?;
    Ok(parsed.to_string())
}

/// Installer artifact filename for a given version
pub fn installer_filename(slug: &str, version: &str) -> String {
    format!("{}_Setup_v{}.exe", slug, version)
}

impl InstallerDescriptor {
    /// Build the descriptor from release configuration plus the single
    /// externally supplied version value.
    pub fn from_config(config: &ReleaseConfig, version: &str) -> Self {
        let mut tasks = Vec::new();
        if config.tasks.desktop_icon.offered {
            tasks.push(TaskEntry {
                name: "desktopicon".to_string(),
                description: "Create a &desktop icon".to_string(),
                group: "Additional icons:".to_string(),
                checked: config.tasks.desktop_icon.checked,
            });
        }
        if config.tasks.run_at_startup.offered {
            tasks.push(TaskEntry {
                name: "startupicon".to_string(),
                description: "Launch at Windows &startup".to_string(),
                group: "Startup:".to_string(),
                checked: config.tasks.run_at_startup.checked,
            });
        }

        Self {
            app_name: config.app.name.clone(),
            version: version.to_string(),
            publisher: config.app.publisher.clone(),
            website: config.app.website.clone(),
            copyright: config.app.copyright.clone(),
            source_dir: format!("{}\\{}", config.packaging.dist_dir, config.packaging.staged_dir),
            output_dir: config.release_dir.clone(),
            output_base_filename: format!("{}_Setup_v{}", config.app.slug, version),
            exe_name: config.app.exe_name.clone(),
            tasks,
            registry: RegistryValue {
                root: "HKCU".to_string(),
                subkey: format!(
                    "Software\\Classes\\AppUserModelId\\{}",
                    config.app.app_user_model_id
                ),
                value_name: "DisplayName".to_string(),
                value_data: config.app.name.clone(),
            },
        }
    }

    /// Render the descriptor into installer-compiler dialect text.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "; Generated by sfo-release - do not edit by hand");
        let _ = writeln!(out, "; Version is supplied by the build, not stored here\n");

        let _ = writeln!(out, "[Setup]");
        let _ = writeln!(out, "AppName={}", self.app_name);
        let _ = writeln!(out, "AppVersion={}", self.version);
        let _ = writeln!(out, "AppVerName={} v{}", self.app_name, self.version);
        let _ = writeln!(out, "AppPublisher={}", self.publisher);
        let _ = writeln!(out, "AppPublisherURL={}", self.website);
        let _ = writeln!(out, "AppCopyright={}", self.copyright);
        let _ = writeln!(out, "DefaultDirName={{autopf}}\\{}", self.app_name);
        let _ = writeln!(out, "DefaultGroupName={}", self.app_name);
        let _ = writeln!(out, "OutputDir={}", self.output_dir);
        let _ = writeln!(out, "OutputBaseFilename={}", self.output_base_filename);
        let _ = writeln!(out, "Compression=lzma");
        let _ = writeln!(out, "SolidCompression=yes");
        let _ = writeln!(out, "WizardStyle=modern\n");

        let _ = writeln!(out, "[Tasks]");
        for task in &self.tasks {
            let flags = if task.checked { "" } else { "; Flags: unchecked" };
            let _ = writeln!(
                out,
                "Name: \"{}\"; Description: \"{}\"; GroupDescription: \"{}\"{}",
                task.name, task.description, task.group, flags
            );
        }
        out.push('\n');

        let _ = writeln!(out, "[Files]");
        let _ = writeln!(
            out,
            "Source: \"{}\\*\"; DestDir: \"{{app}}\"; Flags: ignoreversion recursesubdirs createallsubdirs",
            self.source_dir
        );
        out.push('\n');

        let _ = writeln!(out, "[Icons]");
        let _ = writeln!(
            out,
            "Name: \"{{group}}\\{}\"; Filename: \"{{app}}\\{}\"",
            self.app_name, self.exe_name
        );
        // Optional shortcuts only materialize when the matching task is
        // selected; the Tasks guard is the whole opt-in mechanism.
        if self.has_task("desktopicon") {
            let _ = writeln!(
                out,
                "Name: \"{{autodesktop}}\\{}\"; Filename: \"{{app}}\\{}\"; Tasks: desktopicon",
                self.app_name, self.exe_name
            );
        }
        if self.has_task("startupicon") {
            let _ = writeln!(
                out,
                "Name: \"{{userstartup}}\\{}\"; Filename: \"{{app}}\\{}\"; Tasks: startupicon",
                self.app_name, self.exe_name
            );
        }
        out.push('\n');

        let _ = writeln!(out, "[Registry]");
        let _ = writeln!(
            out,
            "Root: {}; Subkey: \"{}\"; ValueType: string; ValueName: \"{}\"; ValueData: \"{}\"; Flags: uninsdeletekey",
            self.registry.root, self.registry.subkey, self.registry.value_name, self.registry.value_data
        );
        out.push('\n');

        let _ = writeln!(out, "[Run]");
        let _ = writeln!(
            out,
            "Filename: \"{{app}}\\{}\"; Description: \"Launch {}\"; Flags: nowait postinstall skipifsilent",
            self.exe_name, self.app_name
        );

        out
    }

    fn has_task(&self, name: &str) -> bool {
        self.tasks.iter().any(|t| t.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReleaseConfig;

    fn descriptor(version: &str) -> InstallerDescriptor {
        InstallerDescriptor::from_config(&ReleaseConfig::default(), version)
    }

    #[test]
    fn output_filename_embeds_supplied_version() {
        let d = descriptor("2.4.1");
        assert_eq!(d.output_base_filename, "SmartFileOrganizer_Setup_v2.4.1");

        let text = d.render();
        assert!(text.contains("OutputBaseFilename=SmartFileOrganizer_Setup_v2.4.1"));
        assert!(text.contains("AppVersion=2.4.1"));
    }

    #[test]
    fn no_version_drift_between_fields() {
        let d = descriptor("3.0.0");
        let text = d.render();
        // Every versioned field carries the same supplied value; the
        // template has no version of its own to drift from.
        assert!(!text.contains(crate::version::APP_VERSION) || crate::version::APP_VERSION == "3.0.0");
        assert!(text.contains("AppVerName=Smart File Organizer Pro v3.0.0"));
    }

    #[test]
    fn startup_shortcut_is_guarded_by_its_task() {
        let text = descriptor("1.0.0").render();
        let startup_line = text
            .lines()
            .find(|l| l.contains("{userstartup}"))
            .expect("startup shortcut entry");
        assert!(startup_line.contains("Tasks: startupicon"));
    }

    #[test]
    fn unoffered_task_renders_nothing() {
        let mut config = ReleaseConfig::default();
        config.tasks.run_at_startup.offered = false;
        let text = InstallerDescriptor::from_config(&config, "1.0.0").render();
        assert!(!text.contains("startupicon"));
        assert!(!text.contains("{userstartup}"));
    }

    #[test]
    fn optional_tasks_default_unchecked() {
        let text = descriptor("1.0.0").render();
        for line in text.lines().filter(|l| l.starts_with("Name: \"desktopicon\"") || l.starts_with("Name: \"startupicon\"")) {
            assert!(line.contains("Flags: unchecked"));
        }
    }

    #[test]
    fn single_registry_value_under_user_hive() {
        let d = descriptor("1.0.0");
        assert_eq!(d.registry.root, "HKCU");
        assert!(d.registry.subkey.contains("AppUserModelId"));

        let text = d.render();
        let count = text.lines().filter(|l| l.starts_with("Root: HKCU")).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn resolve_version_prefers_override() {
        let v = resolve_version(Some("9.9.9")).unwrap();
        assert_eq!(v, "9.9.9");
    }

    #[test]
    fn resolve_version_rejects_malformed() {
        assert!(resolve_version(Some("not-a-version")).is_err());
    }

    #[test]
    fn installer_filename_shape() {
        assert_eq!(
            installer_filename("SmartFileOrganizer", "1.0.0"),
            "SmartFileOrganizer_Setup_v1.0.0.exe"
        );
    }
}
