use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDateTime};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::cache_context;
use crate::identity::normalize;

const META_FILE: &str = "cache.json";

/// Last-refreshed record for one dataset key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub last_scraped: NaiveDateTime,
}

/// File-backed dataset store with freshness metadata.
///
/// One subdirectory per tournament, one JSON artifact per dataset, plus a
/// metadata file mapping dataset key to last-refreshed instant. Freshness
/// is advisory: a missing or corrupt artifact always forces a refresh no
/// matter what the metadata says.
pub struct CacheStore {
    cache_dir: PathBuf,
}

impl CacheStore {
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(&cache_dir).context("Failed to create cache directory")?;
        Ok(Self { cache_dir })
    }

    /// Freshness key for a tournament's dataset.
    pub fn dataset_key(tournament: &str, dataset: &str) -> String {
        format!("{}_{}", normalize(tournament), dataset)
    }

    // --- Dataset Artifacts ---

    pub fn save_dataset<T: Serialize>(&self, tournament: &str, dataset: &str, data: &T) -> Result<()> {
        let path = self.dataset_path(tournament, dataset);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create tournament cache directory")?;
        }

        let json = serde_json::to_string_pretty(data).context("Failed to serialize dataset")?;
        write_atomic(&path, &json).context(cache_context("write", dataset))?;

        info!("Saved dataset to cache: {}", path.display());
        Ok(())
    }

    /// Load a persisted dataset. Missing or corrupt artifacts yield None so
    /// the caller re-fetches.
    pub fn load_dataset<T: DeserializeOwned>(&self, tournament: &str, dataset: &str) -> Option<T> {
        let path = self.dataset_path(tournament, dataset);
        let json = fs::read_to_string(&path).ok()?;

        match serde_json::from_str(&json) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Corrupt cache artifact {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn dataset_exists(&self, tournament: &str, dataset: &str) -> bool {
        let path = self.dataset_path(tournament, dataset);
        fs::metadata(&path).map(|m| m.len() > 1).unwrap_or(false)
    }

    fn dataset_path(&self, tournament: &str, dataset: &str) -> PathBuf {
        self.cache_dir
            .join(normalize(tournament))
            .join(format!("{dataset}.json"))
    }

    pub fn images_dir(&self) -> PathBuf {
        self.cache_dir.join("images")
    }

    // --- Freshness Metadata ---

    /// Whether the dataset behind `key` was refreshed within the window.
    pub fn is_fresh(&self, key: &str, max_age_minutes: i64) -> bool {
        let Some(last) = self.last_refreshed(key) else {
            return false;
        };
        let age = Local::now().naive_local() - last;
        age < Duration::minutes(max_age_minutes)
    }

    pub fn last_refreshed(&self, key: &str) -> Option<NaiveDateTime> {
        self.load_meta().get(key).map(|entry| entry.last_scraped)
    }

    /// Record that the dataset behind `key` was refreshed just now.
    pub fn touch(&self, key: &str) -> Result<()> {
        let mut meta = self.load_meta();
        meta.insert(
            key.to_string(),
            CacheEntry {
                last_scraped: Local::now().naive_local(),
            },
        );
        self.save_meta(&meta)
    }

    /// Drop the freshness record for `key` (the artifact is left alone).
    pub fn forget(&self, key: &str) -> Result<()> {
        let mut meta = self.load_meta();
        meta.remove(key);
        self.save_meta(&meta)
    }

    fn load_meta(&self) -> HashMap<String, CacheEntry> {
        let path = self.cache_dir.join(META_FILE);
        let Ok(json) = fs::read_to_string(&path) else {
            return HashMap::new();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("Corrupt cache metadata {}: {}", path.display(), e);
            HashMap::new()
        })
    }

    fn save_meta(&self, meta: &HashMap<String, CacheEntry>) -> Result<()> {
        let path = self.cache_dir.join(META_FILE);
        let json = serde_json::to_string_pretty(meta).context("Failed to serialize cache metadata")?;
        write_atomic(&path, &json).context(cache_context("write", META_FILE))
    }
}

/// Write via a sibling temp file and rename, so a crash mid-write can never
/// corrupt the previously good artifact.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).context("Failed to write temp file")?;
    fs::rename(&tmp, path).context("Failed to move temp file into place")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Boat;

    fn temp_store(name: &str) -> CacheStore {
        let dir = std::env::temp_dir().join(format!("sportfish_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        CacheStore::new(&dir).unwrap()
    }

    fn sample_roster() -> Vec<Boat> {
        vec![Boat {
            uid: "reel_tight".to_string(),
            boat: "Reel Tight".to_string(),
            boat_type: "68' Bayliss".to_string(),
            image_path: "/boat-image/reel_tight".to_string(),
        }]
    }

    #[test]
    fn test_dataset_round_trip() {
        let store = temp_store("round_trip");
        store.save_dataset("Big Rock", "participants", &sample_roster()).unwrap();

        let loaded: Vec<Boat> = store.load_dataset("Big Rock", "participants").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].uid, "reel_tight");
        assert!(store.dataset_exists("Big Rock", "participants"));
    }

    #[test]
    fn test_missing_and_corrupt_artifacts_yield_none() {
        let store = temp_store("corrupt");
        assert!(store.load_dataset::<Vec<Boat>>("Big Rock", "events").is_none());

        store.save_dataset("Big Rock", "events", &Vec::<Boat>::new()).unwrap();
        let path = store.dataset_path("Big Rock", "events");
        fs::write(&path, "{ not json").unwrap();
        assert!(store.load_dataset::<Vec<Boat>>("Big Rock", "events").is_none());
    }

    #[test]
    fn test_freshness_after_touch_and_forget() {
        let store = temp_store("freshness");
        let key = CacheStore::dataset_key("Big Rock", "events");

        assert!(!store.is_fresh(&key, 2));
        store.touch(&key).unwrap();
        assert!(store.is_fresh(&key, 2));
        store.forget(&key).unwrap();
        assert!(!store.is_fresh(&key, 2));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let store = temp_store("atomic");
        store.save_dataset("Big Rock", "participants", &sample_roster()).unwrap();

        let tournament_dir = store.cache_dir.join("big_rock");
        let leftovers: Vec<_> = fs::read_dir(&tournament_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_dataset_keys_are_normalized() {
        assert_eq!(CacheStore::dataset_key("Big Rock", "events"), "big_rock_events");
    }
}
