//! On-disk cache of generated resources.
//!
//! Generated graphs and narration scripts are cached as flat JSON/text
//! files under the platform data directory, so repeat generations of the
//! same topic never hit the provider. File names combine a slugified topic
//! with a hash prefix, keeping them filesystem-safe while avoiding
//! collisions between topics that slugify identically.
//!
//! The root directory resolves as `MG_DATA_DIR` env override > platform
//! data dir. Tests inject their own root via [`ResourceCache::open_at`].

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::models::GraphData;
use crate::{Error, Result};

/// Environment variable overriding the cache root.
pub const DATA_DIR_ENV: &str = "MG_DATA_DIR";

/// Characters preserved by [`slugify`]; everything else becomes `_`.
fn is_safe(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Reduce a topic to a filesystem-safe slug.
pub fn slugify(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| if is_safe(c) { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '_' || c == '.').to_string();
    if cleaned.is_empty() {
        "topic".to_string()
    } else {
        cleaned
    }
}

/// Cache file stem for a topic: slug plus an 8-char hash prefix.
fn cache_key(topic: &str) -> String {
    let digest = Sha256::digest(topic.as_bytes());
    let hash: String = digest
        .iter()
        .take(4)
        .map(|b| format!("{:02x}", b))
        .collect();
    format!("{}-{}", slugify(topic), hash)
}

/// File-based cache of generated graphs and narrations.
#[derive(Debug, Clone)]
pub struct ResourceCache {
    base: PathBuf,
}

impl ResourceCache {
    /// Open the cache at the resolved default root, creating directories
    /// as needed.
    pub fn open() -> Result<Self> {
        let base = match std::env::var(DATA_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs::data_dir()
                .ok_or_else(|| Error::Other("no data directory on this platform".to_string()))?
                .join("mindgraph"),
        };
        Self::open_at(&base)
    }

    /// Open the cache rooted at an explicit directory.
    pub fn open_at(base: &Path) -> Result<Self> {
        let cache = Self {
            base: base.to_path_buf(),
        };
        fs::create_dir_all(cache.graphs_dir())?;
        fs::create_dir_all(cache.narrations_dir())?;
        Ok(cache)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn graphs_dir(&self) -> PathBuf {
        self.base.join("graphs")
    }

    fn narrations_dir(&self) -> PathBuf {
        self.base.join("narrations")
    }

    /// Path of the cached graph for a topic.
    pub fn graph_path(&self, topic: &str) -> PathBuf {
        self.graphs_dir().join(format!("{}.json", cache_key(topic)))
    }

    /// Path of the cached narration for a topic.
    pub fn narration_path(&self, topic: &str) -> PathBuf {
        self.narrations_dir()
            .join(format!("{}.txt", cache_key(topic)))
    }

    /// Load a cached graph, if present and parseable.
    pub fn load_graph(&self, topic: &str) -> Option<GraphData> {
        let path = self.graph_path(topic);
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(graph) => {
                debug!(topic, path = %path.display(), "graph cache hit");
                Some(graph)
            }
            Err(_) => None,
        }
    }

    /// Save a graph for a topic.
    pub fn save_graph(&self, topic: &str, graph: &GraphData) -> Result<()> {
        let path = self.graph_path(topic);
        fs::write(&path, serde_json::to_string_pretty(graph)?)?;
        debug!(topic, path = %path.display(), "graph cached");
        Ok(())
    }

    /// Load a cached narration script.
    pub fn load_narration(&self, topic: &str) -> Option<String> {
        fs::read_to_string(self.narration_path(topic)).ok()
    }

    /// Save a narration script for a topic.
    pub fn save_narration(&self, topic: &str, narration: &str) -> Result<()> {
        fs::write(self.narration_path(topic), narration)?;
        Ok(())
    }

    /// Delete every cached entry. Returns the number of files removed.
    pub fn clear(&self) -> Result<usize> {
        let mut removed = 0;
        for dir in [self.graphs_dir(), self.narrations_dir()] {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                if entry.file_type()?.is_file() {
                    fs::remove_file(entry.path())?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_graph;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Rust Ownership"), "Rust_Ownership");
        assert_eq!(slugify("a/b:c"), "a_b_c");
        assert_eq!(slugify("..."), "topic");
        assert_eq!(slugify(""), "topic");
        assert_eq!(slugify("already-safe_name"), "already-safe_name");
    }

    #[test]
    fn test_cache_key_distinguishes_colliding_slugs() {
        // Both slugify to "a_b" but must not share a cache file
        assert_ne!(cache_key("a/b"), cache_key("a:b"));
    }

    #[test]
    fn test_graph_round_trip() {
        let env = TestEnv::new();
        let cache = env.open_cache();
        let graph = default_graph("Rust");

        assert!(cache.load_graph("Rust").is_none());
        cache.save_graph("Rust", &graph).unwrap();
        assert_eq!(cache.load_graph("Rust").unwrap(), graph);
    }

    #[test]
    fn test_narration_round_trip() {
        let env = TestEnv::new();
        let cache = env.open_cache();

        cache.save_narration("Rust", "a narration").unwrap();
        assert_eq!(cache.load_narration("Rust").unwrap(), "a narration");
    }

    #[test]
    fn test_corrupt_graph_entry_is_a_miss() {
        let env = TestEnv::new();
        let cache = env.open_cache();

        std::fs::write(cache.graph_path("Rust"), "{not json").unwrap();
        assert!(cache.load_graph("Rust").is_none());
    }

    #[test]
    fn test_clear_removes_entries() {
        let env = TestEnv::new();
        let cache = env.open_cache();

        cache.save_graph("Rust", &default_graph("Rust")).unwrap();
        cache.save_narration("Rust", "text").unwrap();

        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.load_graph("Rust").is_none());
    }
}
