// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Build journal: one JSONL record per pipeline run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::Result;

/// A single pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub artifacts: Vec<PathBuf>,
    pub success: bool,
}

/// Append-only journal of release builds
pub struct BuildLog {
    path: PathBuf,
}

impl BuildLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Append a record to the journal
    pub fn append(&self, record: &BuildRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let json = serde_json::to_string(record)?;
        writeln!(file, "{}", json)?;

        Ok(())
    }

    /// Read all records in journal order
    pub fn read_all(&self) -> Result<Vec<BuildRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Failed to parse build record: {}", e);
                }
            }
        }

        Ok(records)
    }

    /// Get the most recent N records (newest first)
    pub fn get_recent(&self, count: usize) -> Result<Vec<BuildRecord>> {
        let mut records = self.read_all()?;
        records.reverse();
        records.truncate(count);
        Ok(records)
    }

    /// Clear the journal
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Create a new build record stamped with the current time
pub fn create_record(version: String, artifacts: Vec<PathBuf>, success: bool) -> BuildRecord {
    BuildRecord {
        id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        version,
        artifacts,
        success,
    }
}
