//! In-memory entry cache
//!
//! Entries are keyed by slug and remembered together with the source
//! file's modification time. A lookup with a different mtime is a miss,
//! so an edited file is re-read and re-rendered on the next load.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use crate::content::ContentEntry;

/// Represents a cached entry for a source file
#[derive(Debug, Clone)]
struct CacheEntry {
    mtime: SystemTime,
    entry: ContentEntry,
}

/// Cache of rendered entries for one content directory
#[derive(Debug, Default)]
pub struct ContentCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached entry for `slug`, if it was stored with the same mtime
    pub fn get(&self, slug: &str, mtime: SystemTime) -> Option<ContentEntry> {
        let entries = self.read();
        let cached = entries.get(slug)?;
        if cached.mtime == mtime {
            tracing::debug!("Cache hit: {}", slug);
            Some(cached.entry.clone())
        } else {
            tracing::debug!("Cache stale: {}", slug);
            None
        }
    }

    pub fn insert(&self, slug: &str, mtime: SystemTime, entry: ContentEntry) {
        self.write()
            .insert(slug.to_string(), CacheEntry { mtime, entry });
    }

    /// Drop the entry for `slug`; returns whether one was cached
    pub fn invalidate(&self, slug: &str) -> bool {
        self.write().remove(slug).is_some()
    }

    /// Drop the entry belonging to a source file path
    pub fn invalidate_path(&self, path: &Path) -> bool {
        match path.file_stem().and_then(|s| s.to_str()) {
            Some(slug) => self.invalidate(slug),
            None => false,
        }
    }

    /// Keep only the entries whose slug is in `slugs`; returns how many were dropped
    pub fn retain_slugs<S: AsRef<str>>(&self, slugs: &[S]) -> usize {
        let keep: HashSet<&str> = slugs.iter().map(|s| s.as_ref()).collect();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|slug, _| keep.contains(slug.as_str()));
        before - entries.len()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock leaves the map itself intact
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Get file modification time
pub async fn get_mtime(path: &Path) -> std::io::Result<SystemTime> {
    tokio::fs::metadata(path).await?.modified()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Metadata;
    use std::time::Duration;

    fn entry(slug: &str, body: &str) -> ContentEntry {
        ContentEntry::new(slug, Metadata::new(), body.to_string())
    }

    #[test]
    fn test_hit_and_stale() {
        let cache = ContentCache::new();
        let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let t1 = t0 + Duration::from_secs(1);

        cache.insert("hello", t0, entry("hello", "<p>v1</p>"));
        assert_eq!(cache.get("hello", t0).unwrap().source, "<p>v1</p>");
        assert!(cache.get("hello", t1).is_none());
        assert!(cache.get("other", t0).is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = ContentCache::new();
        let t0 = SystemTime::UNIX_EPOCH;
        cache.insert("a", t0, entry("a", ""));
        cache.insert("b", t0, entry("b", ""));
        assert_eq!(cache.len(), 2);

        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert!(cache.invalidate_path(Path::new("/site/content/b.mdx")));
        assert!(cache.is_empty());

        cache.insert("c", t0, entry("c", ""));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_retain_slugs() {
        let cache = ContentCache::new();
        let t0 = SystemTime::UNIX_EPOCH;
        for slug in ["a", "b", "c"] {
            cache.insert(slug, t0, entry(slug, ""));
        }

        assert_eq!(cache.retain_slugs(&["a", "c", "new"]), 1);
        assert!(cache.get("a", t0).is_some());
        assert!(cache.get("b", t0).is_none());
        assert_eq!(cache.retain_slugs(&["a", "c"]), 0);
        assert_eq!(cache.retain_slugs::<String>(&[]), 2);
        assert!(cache.is_empty());
    }
}
