// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Published-release check against the GitHub releases API

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

use crate::{Result, Version};

/// Cache file keeping the once-per-day check throttle
pub const UPDATE_CACHE_FILE: &str = "update_cache.json";

/// GitHub releases API client
pub struct GithubClient {
    client: Client,
    repo: String,
}

/// Latest published release, as reported by GitHub
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
    pub html_url: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Comparison of the local version against the latest published one
#[derive(Debug, Clone, Serialize)]
pub struct UpdateStatus {
    pub current_version: String,
    pub latest_version: String,
    pub release_url: String,
    pub published_at: Option<DateTime<Utc>>,
    /// True when the published release is newer than the local build
    pub update_available: bool,
    /// True when the local build is ahead of anything published (the
    /// usual state right before cutting a release)
    pub local_ahead: bool,
}

/// Timestamped record of the last check
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCache {
    pub last_check: DateTime<Utc>,
    pub update_available: bool,
    pub latest_version: Option<String>,
    pub current_version: String,
}

impl GithubClient {
    /// Create a client for `owner/repo`
    pub fn new(repo: &str) -> Self {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(10))
            .user_agent(format!("SmartFileOrganizer/{}", crate::version::APP_VERSION))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            repo: repo.to_string(),
        }
    }

    /// Fetch the latest published release
    pub async fn latest_release(&self) -> Result<ReleaseInfo> {
        let url = format!("https://api.github.com/repos/{}/releases/latest", self.repo);
        debug!("Checking latest release at {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?
            .error_for_status()?;

        let info: ReleaseInfo = response.json().await?;
        Ok(info)
    }

    /// Compare the local version against the latest published release.
    pub async fn check(&self, current: &str) -> Result<UpdateStatus> {
        let release = self.latest_release().await?;
        compare_release(current, &release)
    }
}

/// Pure comparison half of the update check, split out for testing.
pub fn compare_release(current: &str, release: &ReleaseInfo) -> Result<UpdateStatus> {
    let local: Version = current.parse()?;
    let published: Version = release.tag_name.parse()?;

    Ok(UpdateStatus {
        current_version: local.to_string(),
        latest_version: published.to_string(),
        release_url: release.html_url.clone(),
        published_at: release.published_at,
        update_available: published > local,
        local_ahead: local > published,
    })
}

/// Read the last recorded check, if any is legible
pub fn read_cache(cache_path: &Path) -> Option<UpdateCache> {
    let content = std::fs::read_to_string(cache_path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Whether enough time has passed since the last recorded check.
/// Unreadable cache state always answers yes.
pub fn should_check(cache_path: &Path) -> bool {
    let Ok(content) = std::fs::read_to_string(cache_path) else {
        return true;
    };
    match serde_json::from_str::<UpdateCache>(&content) {
        Ok(cache) => Utc::now() - cache.last_check >= Duration::days(1),
        Err(e) => {
            warn!("Error reading update cache: {}", e);
            true
        }
    }
}

/// Persist the outcome of a check for the daily throttle
pub fn save_cache(cache_path: &Path, status: &UpdateStatus) -> Result<PathBuf> {
    let cache = UpdateCache {
        last_check: Utc::now(),
        update_available: status.update_available,
        latest_version: Some(status.latest_version.clone()),
        current_version: status.current_version.clone(),
    };
    std::fs::write(cache_path, serde_json::to_string_pretty(&cache)?)?;
    debug!("Update cache saved");
    Ok(cache_path.to_path_buf())
}
