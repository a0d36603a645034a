// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Bittu Kumar Azad

//! Application identity and version handling
//!
//! Single source of truth for the version string that gets stamped into
//! every artifact name and installer metadata field.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{ReleaseError, Result};

/// Application name as shown to end users
pub const APP_NAME: &str = "Smart File Organizer Pro";

/// Short name used in artifact filenames
pub const APP_SLUG: &str = "SmartFileOrganizer";

/// Default version built when no override is supplied
pub const APP_VERSION: &str = "1.0.0";

pub const APP_PUBLISHER: &str = "Bittu Kumar Azad";
pub const APP_COPYRIGHT: &str = "Copyright © 2025 Bittu Kumar Azad";
pub const APP_WEBSITE: &str = "https://github.com/Bittukrazad/smart-file-organizer";

/// Identity registered for desktop notifications (AppUserModelID)
pub const APP_USER_MODEL_ID: &str = "smart file organizer pro";

/// GitHub repository used for published releases
pub const GITHUB_REPO: &str = "Bittukrazad/smart-file-organizer";

/// A dotted numeric version, compared component-wise with missing
/// components treated as zero (so "1.2" == "1.2.0").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(pub Vec<u32>);

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.trim().trim_start_matches('v');
        if raw.is_empty() {
            return Err(ReleaseError::Version(s.to_string()));
        }
        let parts = raw
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| ReleaseError::Version(s.to_string())))
            .collect::<Result<Vec<u32>>>()?;
        Ok(Version(parts))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

/// Full display string, e.g. "Smart File Organizer Pro v1.0.0"
pub fn full_version_string(version: &str) -> String {
    format!("{} v{}", APP_NAME, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_v_prefixed() {
        assert_eq!("1.2.3".parse::<Version>().unwrap(), Version(vec![1, 2, 3]));
        assert_eq!("v2.0".parse::<Version>().unwrap(), Version(vec![2, 0]));
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Version>().is_err());
        assert!("1.2.x".parse::<Version>().is_err());
        assert!("one".parse::<Version>().is_err());
    }

    #[test]
    fn missing_components_compare_as_zero() {
        let a: Version = "1.2".parse().unwrap();
        let b: Version = "1.2.0".parse().unwrap();
        assert_eq!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn ordering_is_component_wise() {
        let older: Version = "1.9.9".parse().unwrap();
        let newer: Version = "1.10.0".parse().unwrap();
        assert!(older < newer);
        assert!("2.0".parse::<Version>().unwrap() > "1.99.99".parse::<Version>().unwrap());
    }

    #[test]
    fn display_round_trips() {
        let v: Version = "3.1.4".parse().unwrap();
        assert_eq!(v.to_string(), "3.1.4");
    }

    #[test]
    fn full_version_includes_app_name() {
        let s = full_version_string("1.0.0");
        assert!(s.contains(APP_NAME));
        assert!(s.ends_with("v1.0.0"));
    }
}
