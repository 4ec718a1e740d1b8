//! Revalidation cache
//!
//! Tracks when each page was generated so that pages older than the
//! configured revalidation window can be detected and regenerated in the
//! background. Time-based only: the remote document itself is never hashed.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Cache file name
const CACHE_FILE: &str = ".caravel-cache/db.json";

/// Represents a cached entry for a generated page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Unix timestamp of the last successful generation
    pub generated_at: u64,
    /// Output path relative to the public dir
    pub output_path: String,
}

/// Cache database tracking page generation times
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Cached entries, keyed by slug
    pub posts: HashMap<String, CacheEntry>,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or create a new empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, starting fresh");
            }
        }
        Self::new()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Create a new cache with version set
    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            ..Default::default()
        }
    }

    /// Record a successful generation for `slug`
    pub fn record(&mut self, slug: &str, output_path: &str, now: u64) {
        self.posts.insert(
            slug.to_string(),
            CacheEntry {
                generated_at: now,
                output_path: output_path.to_string(),
            },
        );
    }

    /// Whether the page for `slug` is missing or past the revalidation window
    pub fn is_stale(&self, slug: &str, now: u64, revalidate_secs: u64) -> bool {
        match self.posts.get(slug) {
            Some(entry) => now.saturating_sub(entry.generated_at) >= revalidate_secs,
            None => true,
        }
    }
}

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
