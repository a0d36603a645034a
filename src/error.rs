// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Error types for the release pipeline

use thiserror::Error;

/// Result type alias for release pipeline operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Release pipeline error types
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing prerequisite: {0}")]
    Prerequisite(String),

    #[error("{step} failed (exit {code:?})")]
    CommandFailed { step: String, code: Option<i32> },

    #[error("Verification failed: {0}")]
    Verify(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Invalid version '{0}'")]
    Version(String),
}
