//! Card cache with TTL.
//!
//! Caches Scryfall lookups in a single JSON file (`.cache.json` by default)
//! keyed by exact card name. Each entry records when it was retrieved;
//! entries older than 12 hours are refetched. The whole file is read once at
//! startup and rewritten once at the end of a run.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::types::Card;

/// Default cache file, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = ".cache.json";

/// How long a cached card is trusted.
pub const CACHE_EXPIRE: Duration = Duration::from_secs(12 * 60 * 60);

/// A cached card and the time it was retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Retrieval time in epoch seconds
    pub retrieved: f64,
    /// Card object as returned by Scryfall
    pub card: Card,
}

/// File-backed card cache.
pub struct CardCache {
    path: PathBuf,
    ttl: Duration,
    entries: BTreeMap<String, CacheEntry>,
}

impl CardCache {
    /// Load the cache file at `path`.
    ///
    /// A missing file yields an empty cache. Any other read or parse failure
    /// is returned as an error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse cache file: {}", path.display()))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No cache file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read cache file: {}", path.display()))
            }
        };

        let cache = Self {
            path,
            ttl: CACHE_EXPIRE,
            entries,
        };
        log::debug!("Loaded card cache with {} entries", cache.len());
        Ok(cache)
    }

    /// Write every entry back to the cache file, replacing its contents.
    pub fn save(&self) -> Result<()> {
        let content =
            serde_json::to_string(&self.entries).context("Failed to serialize card cache")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write cache file: {}", self.path.display()))?;

        log::debug!("Saved card cache with {} entries", self.len());
        Ok(())
    }

    /// Get the entry for a card name, fresh or not.
    pub fn get(&self, name: &str) -> Option<&CacheEntry> {
        self.entries.get(name)
    }

    /// Get the cached card if its entry is younger than the TTL at `now`.
    pub fn get_fresh(&self, name: &str, now: f64) -> Option<&Card> {
        self.get(name)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| &entry.card)
    }

    /// Check whether an entry is still trusted at `now` (epoch seconds).
    pub fn is_fresh(&self, entry: &CacheEntry, now: f64) -> bool {
        now - entry.retrieved < self.ttl.as_secs_f64()
    }

    /// Insert or overwrite the entry for a card name.
    pub fn insert(&mut self, name: &str, retrieved: f64, card: Card) {
        self.entries
            .insert(name.to_string(), CacheEntry { retrieved, card });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn card(name: &str) -> Card {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "image_uris": { "small": format!("https://cards.example/{}.jpg", name) },
            "prices": { "usd": "1.00" },
            "type_line": "Instant",
            "cmc": 1.0,
            "set": "lea"
        }))
        .unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CardCache::load(temp_dir.path().join(".cache.json")).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cache.json");
        fs::write(&path, "{ not json").unwrap();

        let err = CardCache::load(&path).err().unwrap();
        assert!(err.to_string().contains("Failed to parse cache file"));
    }

    #[test]
    fn test_cache_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cache.json");

        let mut cache = CardCache::load(&path).unwrap();
        cache.insert("Lightning Bolt", 1_700_000_000.25, card("Lightning Bolt"));
        cache.insert("Llanowar Elves", 1_700_003_600.5, card("Llanowar Elves"));
        cache.save().unwrap();

        let loaded = CardCache::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries, cache.entries);
        assert_eq!(
            loaded.get("Lightning Bolt").unwrap().retrieved,
            1_700_000_000.25
        );
    }

    #[test]
    fn test_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cache.json");

        let mut cache = CardCache::load(&path).unwrap();
        cache.insert("Lightning Bolt", 1_700_000_000.0, card("Lightning Bolt"));
        cache.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &raw["Lightning Bolt"];
        assert_eq!(entry["retrieved"], serde_json::json!(1_700_000_000.0));
        assert_eq!(entry["card"]["name"], "Lightning Bolt");
        assert_eq!(entry["card"]["set"], "lea");
    }

    #[test]
    fn test_freshness_boundary() {
        let temp_dir = TempDir::new().unwrap();
        let mut cache = CardCache::load(temp_dir.path().join(".cache.json")).unwrap();
        let retrieved = 1_700_000_000.0;
        let ttl = CACHE_EXPIRE.as_secs_f64();
        cache.insert("Lightning Bolt", retrieved, card("Lightning Bolt"));

        assert!(cache.get_fresh("Lightning Bolt", retrieved).is_some());
        assert!(cache.get_fresh("Lightning Bolt", retrieved + ttl - 1.0).is_some());
        assert!(cache.get_fresh("Lightning Bolt", retrieved + ttl).is_none());
        assert!(cache.get("Lightning Bolt").is_some());
        assert!(cache.get_fresh("Counterspell", retrieved).is_none());
    }
}
