// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! sfo-release CLI: build & release pipeline for Smart File Organizer Pro
//!
//! Replaces the old release script and hand-maintained installer script
//! with one tool that produces a version-stamped installer and portable
//! archive per build.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use sfo_release::buildlog::BuildLog;
use sfo_release::descriptor::{self, InstallerDescriptor};
use sfo_release::pipeline::{self, PipelineOptions};
use sfo_release::update::{self, GithubClient};
use sfo_release::{clean, portable, prereqs, version};
use sfo_release::{ReleaseConfig, Result};

/// Release pipeline for Smart File Organizer Pro
#[derive(Parser, Debug)]
#[command(name = "sfo-release")]
#[command(author = "Bittu Kumar Azad")]
#[command(version = version::APP_VERSION)]
#[command(about = "Build and release pipeline for Smart File Organizer Pro", long_about = None)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "release.json", global = true)]
    config: PathBuf,

    /// Workspace root the pipeline operates in
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full build pipeline (default)
    Build {
        /// Version to stamp into artifacts (overrides APP_VERSION env)
        #[arg(long)]
        version: Option<String>,

        /// Keep previous build output instead of cleaning
        #[arg(long)]
        skip_clean: bool,

        /// Skip the prerequisite tool probes
        #[arg(long)]
        skip_prereq_check: bool,
    },

    /// Probe the external tools without building anything
    Check,

    /// Remove previous build output
    Clean,

    /// Render the installer descriptor
    Descriptor {
        /// Version to substitute into the descriptor
        #[arg(long)]
        version: Option<String>,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create only the portable archive from existing dist output
    Archive {
        /// Version to stamp into the archive name
        #[arg(long)]
        version: Option<String>,
    },

    /// Build journal operations
    History {
        #[command(subcommand)]
        action: HistoryCommands,
    },

    /// Show tool status and the latest published release
    Status,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommands {
    /// List recent builds
    List {
        /// Number of records to show
        #[arg(long, default_value = "10")]
        count: usize,
    },

    /// Clear the build journal
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "release.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if !cli.quiet {
        info!("{}", version::full_version_string(version::APP_VERSION));
    }

    let config = ReleaseConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::Build { version, skip_clean, skip_prereq_check }) => {
            run_build(&cli.root, config, version, skip_clean, skip_prereq_check)
        }
        Some(Commands::Check) => run_check(config),
        Some(Commands::Clean) => run_clean(&cli.root, config),
        Some(Commands::Descriptor { version, output }) => {
            run_descriptor(config, version, output)
        }
        Some(Commands::Archive { version }) => run_archive(&cli.root, config, version),
        Some(Commands::History { action }) => run_history(&cli.root, config, action),
        Some(Commands::Status) => run_status(&cli.root, config).await,
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
        None => {
            // Default: full build pipeline
            run_build(&cli.root, config, None, false, false)
        }
    }
}

/// Run the full pipeline; any failure propagates to a non-zero exit
fn run_build(
    root: &Path,
    config: ReleaseConfig,
    version: Option<String>,
    skip_clean: bool,
    skip_prereq_check: bool,
) -> Result<()> {
    let opts = PipelineOptions {
        version,
        skip_clean,
        skip_prereq_check,
    };
    pipeline::run(root, &config, &opts)?;
    Ok(())
}

fn run_check(config: ReleaseConfig) -> Result<()> {
    prereqs::check_all(&config)?;
    println!("All prerequisites found");
    Ok(())
}

fn run_clean(root: &Path, config: ReleaseConfig) -> Result<()> {
    let removed = clean::clean_build(root, &config)?;
    if removed.is_empty() {
        println!("Nothing to clean");
    } else {
        println!("Removed: {}", removed.join(", "));
    }
    Ok(())
}

fn run_descriptor(
    config: ReleaseConfig,
    version: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let version = descriptor::resolve_version(version.as_deref())?;
    let text = InstallerDescriptor::from_config(&config, &version).render();

    match output {
        Some(path) => {
            std::fs::write(&path, text)?;
            println!("Descriptor written to {:?}", path);
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn run_archive(root: &Path, config: ReleaseConfig, version: Option<String>) -> Result<()> {
    let version = descriptor::resolve_version(version.as_deref())?;
    match portable::create_portable(root, &config, &version)? {
        Some(path) => println!("Portable archive: {}", path.display()),
        None => println!("No dist output to archive; run a build first"),
    }
    Ok(())
}

fn run_history(root: &Path, config: ReleaseConfig, action: HistoryCommands) -> Result<()> {
    let log = BuildLog::new(pipeline::build_log_path(root, &config));

    match action {
        HistoryCommands::List { count } => {
            let records = log.get_recent(count)?;
            println!("Recent builds ({} records):", records.len());
            for record in records {
                let status = if record.success { "ok" } else { "FAILED" };
                println!(
                    "  {} v{} [{}] {} artifact(s)",
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.version,
                    status,
                    record.artifacts.len()
                );
            }
        }
        HistoryCommands::Clear { force } => {
            if !force {
                eprintln!("Use --force to confirm clearing the build journal");
                return Ok(());
            }
            log.clear()?;
            println!("Build journal cleared");
        }
    }

    Ok(())
}

/// Show identity, configuration, and how the local version relates to
/// the latest published GitHub release
async fn run_status(root: &Path, config: ReleaseConfig) -> Result<()> {
    println!("{}", version::full_version_string(version::APP_VERSION));
    println!("{}", "=".repeat(40));

    println!("\nConfiguration:");
    println!("  Packaging tool: {}", config.packaging.program);
    println!("  Installer compiler: {}", config.installer.compiler);
    println!("  Release dir: {}", config.release_dir);
    println!("  Portable format: {}", config.portable.format);

    match prereqs::check_all(&config) {
        Ok(()) => println!("\nPrerequisites: ok"),
        Err(e) => println!("\nPrerequisites: {}", e),
    }

    if config.update.enabled {
        let cache_path = root.join(update::UPDATE_CACHE_FILE);

        // Checked within the last day: report the cached result instead
        // of hitting the API again.
        if !update::should_check(&cache_path) {
            if let Some(cache) = update::read_cache(&cache_path) {
                println!(
                    "\nPublished release: v{} (cached, checked {})",
                    cache.latest_version.as_deref().unwrap_or("unknown"),
                    cache.last_check.format("%Y-%m-%d %H:%M")
                );
                if cache.update_available {
                    println!("  A newer release is published");
                } else {
                    println!("  No newer release at last check");
                }
                return Ok(());
            }
        }

        let client = GithubClient::new(&config.update.github_repo);
        match client.check(version::APP_VERSION).await {
            Ok(status) => {
                match status.published_at {
                    Some(date) => println!(
                        "\nPublished release: v{} ({})",
                        status.latest_version,
                        date.format("%Y-%m-%d")
                    ),
                    None => println!("\nPublished release: v{}", status.latest_version),
                }
                if status.update_available {
                    println!("  A newer release is published: {}", status.release_url);
                } else if status.local_ahead {
                    println!("  Local version is ahead; ready to cut a release");
                } else {
                    println!("  Local version matches the published release");
                }
                if let Err(e) = update::save_cache(&cache_path, &status) {
                    warn!("Failed to save update cache: {}", e);
                }
            }
            Err(e) => println!("\nPublished release: error - {}", e),
        }
    }

    Ok(())
}

fn run_config_command(
    config: ReleaseConfig,
    action: ConfigCommands,
    config_path: &Path,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            let default_config = ReleaseConfig::default();
            default_config.save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            println!("Configuration at {:?} is valid", config_path);
            println!("  App: {}", config.app.name);
            println!("  Dist dir: {}", config.packaging.dist_dir);
            println!("  Release dir: {}", config.release_dir);
        }
    }

    Ok(())
}
