// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! sfo-release: build & release pipeline for Smart File Organizer Pro
//!
//! Drives the full release sequence: prerequisite checks, cleanup, the
//! external packaging step, installer generation, portable archive and
//! checksums, with a journal of every run.

pub mod buildlog;
pub mod checksum;
pub mod clean;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod installer;
pub mod package;
pub mod pipeline;
pub mod portable;
pub mod prereqs;
pub mod update;
pub mod version;

pub use config::ReleaseConfig;
pub use error::{ReleaseError, Result};
pub use version::Version;
