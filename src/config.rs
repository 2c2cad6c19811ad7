//! Platform rate limit configuration.
//!
//! Limits are a static table supplied at guard construction time: platform
//! name -> action kind -> daily cap. The table can be built in code, loaded
//! from a YAML file, or taken from [`PlatformLimits::default`], which carries
//! the reference caps for the four supported platforms.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::{GuardError, Result};

/// Daily cap applied to action kinds a known platform does not list.
pub const DEFAULT_KIND_CAP: u32 = 10;

/// Per-platform daily action caps.
///
/// Keys are platform names ("instagram", "tiktok", ...); values map an action
/// kind ("posts", "likes", ...) to the maximum number of such actions allowed
/// in a rolling 24-hour window. The table is not mutated by the guard at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformLimits {
    /// Map of platform name to per-kind daily caps
    #[serde(default)]
    platforms: HashMap<String, HashMap<String, u32>>,
}

impl Default for PlatformLimits {
    fn default() -> Self {
        let mut platforms = HashMap::new();
        platforms.insert(
            "instagram".to_string(),
            caps(&[
                ("posts", 30),
                ("dms", 150),
                ("likes", 350),
                ("comments", 150),
                ("actions", 150),
            ]),
        );
        platforms.insert(
            "tiktok".to_string(),
            caps(&[("posts", 50), ("likes", 500), ("comments", 200)]),
        );
        platforms.insert(
            "youtube".to_string(),
            caps(&[("posts", 20), ("likes", 200), ("comments", 100)]),
        );
        platforms.insert(
            "telegram".to_string(),
            caps(&[("posts", 100), ("messages", 1000)]),
        );
        Self { platforms }
    }
}

fn caps(entries: &[(&str, u32)]) -> HashMap<String, u32> {
    entries
        .iter()
        .map(|(kind, cap)| (kind.to_string(), *cap))
        .collect()
}

impl PlatformLimits {
    /// Create an empty limits table (no platforms known).
    pub fn empty() -> Self {
        Self {
            platforms: HashMap::new(),
        }
    }

    /// Load limits from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading platform limits");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load limits from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let limits: PlatformLimits = serde_yaml::from_str(yaml)
            .map_err(|e| GuardError::Config(format!("Failed to parse platform limits: {}", e)))?;
        limits.validate()?;
        Ok(limits)
    }

    fn validate(&self) -> Result<()> {
        for (platform, kinds) in &self.platforms {
            for (kind, cap) in kinds {
                if *cap == 0 {
                    return Err(GuardError::Config(format!(
                        "Daily cap for {}/{} must be positive",
                        platform, kind
                    )));
                }
            }
        }
        Ok(())
    }

    /// Set or replace the daily cap for a (platform, kind) pair.
    pub fn set_cap(&mut self, platform: &str, kind: &str, cap: u32) {
        self.platforms
            .entry(platform.to_string())
            .or_default()
            .insert(kind.to_string(), cap);
    }

    /// Look up the daily cap for a (platform, kind) pair.
    ///
    /// Returns `None` for an unknown platform: a missing platform entry must
    /// never be read as "no limit", so callers fail closed on `None`. Known
    /// platforms fall back to [`DEFAULT_KIND_CAP`] for unlisted kinds.
    pub fn cap_for(&self, platform: &str, kind: &str) -> Option<u32> {
        let kinds = self.platforms.get(platform)?;
        Some(kinds.get(kind).copied().unwrap_or(DEFAULT_KIND_CAP))
    }

    /// Whether the platform is present in the table.
    pub fn knows_platform(&self, platform: &str) -> bool {
        self.platforms.contains_key(platform)
    }

    /// Iterate over all configured (platform, kind, cap) entries.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        self.platforms.iter().flat_map(|(platform, kinds)| {
            kinds
                .iter()
                .map(move |(kind, cap)| (platform.as_str(), kind.as_str(), *cap))
        })
    }
}
