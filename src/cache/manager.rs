//! Cache manager for persisting API responses to disk
//!
//! Provides a `CacheManager` that stores serializable data to JSON files stamped
//! with the time they were written. Freshness is decided at read time against a
//! caller-supplied maximum age, so one entry can serve callers with different TTLs.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extension used for cache entry files
const ENTRY_EXTENSION: &str = "json";

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached
    cached_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the entry is at least as old as the requested maximum age
    pub is_expired: bool,
}

/// Manages reading and writing cached data to disk
///
/// The cache manager stores data as JSON files in an XDG-compliant cache directory
/// (`~/.cache/swingcoach/` on Linux). Expired entries are still returned (with
/// `is_expired = true`) so callers can decide whether stale data is acceptable.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Directory where cache files are stored
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a new CacheManager using XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "swingcoach")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheManager with a custom cache directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache entries
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the path to a cache file for the given key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!("{}.{}", sanitize_key(key), ENTRY_EXTENSION))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes data to the cache, replacing any previous entry for `key`
    ///
    /// # Arguments
    /// * `key` - Unique identifier for the cache entry (e.g., "featured_videos")
    /// * `data` - The data to cache (must implement Serialize)
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if directory creation or file writing fails
    pub fn write<T: Serialize>(&self, key: &str, data: &T) -> io::Result<()> {
        self.ensure_dir()?;

        let entry = CacheEntry {
            data,
            cached_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let path = self.cache_path(key);
        debug!(path = %path.display(), "writing cache entry");
        fs::write(path, json)
    }

    /// Reads data from the cache
    ///
    /// An entry is fresh while its age is strictly below `max_age`.
    ///
    /// # Returns
    /// * `Some(CachedData<T>)` if the entry exists and can be parsed
    /// * `None` if the entry doesn't exist or parsing fails
    pub fn read<T: DeserializeOwned>(&self, key: &str, max_age: Duration) -> Option<CachedData<T>> {
        let path = self.cache_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read cache entry");
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                return None;
            }
        };

        let age = Utc::now() - entry.cached_at;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired: age >= max_age,
        })
    }

    /// Removes a single cache entry; a missing entry is not an error
    pub fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.cache_path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Removes every cache entry and returns how many were deleted
    pub fn clear(&self) -> io::Result<usize> {
        let entries = match fs::read_dir(&self.cache_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        debug!(removed, dir = %self.cache_dir.display(), "cleared cache");
        Ok(removed)
    }
}

/// Maps a cache key onto a safe file stem
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    fn one_hour() -> Duration {
        Duration::hours(1)
    }

    #[test]
    fn test_write_creates_file_in_cache_directory() {
        let (cache, temp_dir) = create_test_cache();
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };

        cache.write("test_key", &data).expect("Write should succeed");

        let expected_path = temp_dir.path().join("test_key.json");
        assert!(expected_path.exists(), "Cache file should exist");

        let content = fs::read_to_string(&expected_path).expect("Should read file");
        assert!(content.contains("\"cached_at\""));
        assert!(content.contains("\"test\""));
        assert!(content.contains("42"));
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (cache, _temp_dir) = create_test_cache();

        let result: Option<CachedData<TestData>> = cache.read("nonexistent_key", one_hour());

        assert!(result.is_none(), "Should return None for missing key");
    }

    #[test]
    fn test_read_returns_fresh_entry_within_max_age() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "fresh".to_string(),
            value: 100,
        };

        cache.write("fresh_key", &data).expect("Write should succeed");

        let result: CachedData<TestData> =
            cache.read("fresh_key", one_hour()).expect("Should read fresh cache");

        assert_eq!(result.data, data);
        assert!(!result.is_expired, "Fresh cache should not be expired");
    }

    #[test]
    fn test_zero_max_age_marks_entry_expired() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "expired".to_string(),
            value: 0,
        };

        cache.write("expired_key", &data).expect("Write should succeed");

        let result: CachedData<TestData> =
            cache.read("expired_key", Duration::zero()).expect("Should read expired cache");

        assert_eq!(result.data, data);
        assert!(result.is_expired, "Entry should be expired at zero max age");
    }

    #[test]
    fn test_old_entry_is_expired() {
        let (cache, temp_dir) = create_test_cache();
        let cached_at = Utc::now() - Duration::hours(2);
        let json = format!(
            r#"{{"data":{{"name":"old","value":7}},"cached_at":"{}"}}"#,
            cached_at.to_rfc3339()
        );
        fs::write(temp_dir.path().join("old_key.json"), json).unwrap();

        let result: CachedData<TestData> = cache.read("old_key", one_hour()).unwrap();

        assert_eq!(result.data.name, "old");
        assert!(result.is_expired);
        assert!(!cache.read::<TestData>("old_key", Duration::hours(3)).unwrap().is_expired);
    }

    #[test]
    fn test_corrupt_entry_reads_as_none() {
        let (cache, temp_dir) = create_test_cache();
        fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();

        let result: Option<CachedData<TestData>> = cache.read("broken", one_hour());

        assert!(result.is_none());
    }

    #[test]
    fn test_write_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("cache").join("dir");
        let cache = CacheManager::with_dir(nested_path.clone());

        let data = TestData {
            name: "nested".to_string(),
            value: 1,
        };

        cache.write("nested_key", &data).expect("Write should succeed");

        assert!(nested_path.exists(), "Nested directory should be created");
        assert!(nested_path.join("nested_key.json").exists(), "Cache file should exist");
    }

    #[test]
    fn test_cached_at_timestamp_is_recorded() {
        let (cache, _temp_dir) = create_test_cache();
        let data = TestData {
            name: "timestamp".to_string(),
            value: 999,
        };

        let before = Utc::now();
        cache.write("timestamp_key", &data).expect("Write should succeed");
        let after = Utc::now();

        let result: CachedData<TestData> =
            cache.read("timestamp_key", one_hour()).expect("Should read cache");

        assert!(result.cached_at >= before, "cached_at should be after write started");
        assert!(result.cached_at <= after, "cached_at should be before write finished");
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(cache) = CacheManager::new() {
            let path_str = cache.cache_dir.to_string_lossy();
            assert!(
                path_str.contains("swingcoach"),
                "Cache path should contain project name"
            );
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }

    #[test]
    fn test_overwrite_existing_cache() {
        let (cache, _temp_dir) = create_test_cache();
        let data1 = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let data2 = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache.write("overwrite_key", &data1).expect("First write should succeed");
        cache.write("overwrite_key", &data2).expect("Second write should succeed");

        let result: CachedData<TestData> =
            cache.read("overwrite_key", one_hour()).expect("Should read cache");

        assert_eq!(result.data, data2, "Cache should contain latest data");
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let (cache, _temp_dir) = create_test_cache();
        assert!(cache.remove("never_written").is_ok());
    }

    #[test]
    fn test_remove_deletes_entry() {
        let (cache, _temp_dir) = create_test_cache();
        cache.write("gone", &1u32).unwrap();

        cache.remove("gone").unwrap();

        assert!(cache.read::<u32>("gone", one_hour()).is_none());
    }

    #[test]
    fn test_clear_removes_only_cache_entries() {
        let (cache, temp_dir) = create_test_cache();
        cache.write("featured_videos", &vec![1, 2, 3]).unwrap();
        cache.write("video_library_100_0", &vec![4]).unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "keep me").unwrap();

        let removed = cache.clear().unwrap();

        assert_eq!(removed, 2);
        assert!(temp_dir.path().join("notes.txt").exists());
        assert!(cache.read::<Vec<i32>>("featured_videos", one_hour()).is_none());
    }

    #[test]
    fn test_clear_missing_directory_removes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheManager::with_dir(temp_dir.path().join("absent"));

        assert_eq!(cache.clear().unwrap(), 0);
    }

    #[test]
    fn test_sanitize_key_replaces_path_characters() {
        assert_eq!(sanitize_key("Video/../Library 1"), "video____library_1");
        assert_eq!(sanitize_key("analysis_results"), "analysis_results");
    }
}
