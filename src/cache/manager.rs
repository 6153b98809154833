use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

/// Consider cache stale after 1 hour
const CACHE_STALE_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > CACHE_STALE_MINUTES
    }
}

/// Keyed JSON snapshot cache for listing responses.
///
/// Mutations invalidate their resource key; the next read misses and
/// re-fetches. Keys are resource names, one file per key.
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", key))?;
        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", key))?;

        Ok(Some(cached))
    }

    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(self.cache_path(key), contents)
            .with_context(|| format!("Failed to write cache file: {}", key))?;
        Ok(())
    }

    /// Drop one key so the next read re-fetches
    pub fn invalidate(&self, key: &str) -> Result<()> {
        let path = self.cache_path(key);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache file: {}", key))?;
            debug!(key, "Cache key invalidated");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_roundtrip_and_invalidate() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();

        assert!(cache.load::<Vec<String>>("companies").unwrap().is_none());

        let names = vec!["Sahel Logistics".to_string(), "Teranga Foods".to_string()];
        cache.save("companies", &names).unwrap();

        let cached = cache.load::<Vec<String>>("companies").unwrap().unwrap();
        assert_eq!(cached.data, names);
        assert!(!cached.is_stale());

        cache.invalidate("companies").unwrap();
        assert!(cache.load::<Vec<String>>("companies").unwrap().is_none());
    }

    #[test]
    fn test_invalidate_missing_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        cache.invalidate("never-written").unwrap();
    }

    #[test]
    fn test_staleness_by_age() {
        let fresh = CachedData::new(1);
        assert!(!fresh.is_stale());

        let old = CachedData {
            data: 1,
            cached_at: Utc::now() - chrono::Duration::minutes(CACHE_STALE_MINUTES + 5),
        };
        assert!(old.is_stale());
    }
}
