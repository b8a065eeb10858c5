//! Disk-backed cache store.
//!
//! Each captured response lives in its own JSON file under
//! `<cache dir>/<cache name>/`, wrapped with the path it was captured for
//! and a capture timestamp. The timestamp is informational only (shown by
//! `noqe-sw status`); entries are never expired or evicted.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Request, Response};

use super::{CacheStore, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    pub path: String,
    pub response: Response,
    pub captured_at: DateTime<Utc>,
}

impl StoredEntry {
    pub fn new(path: &str, response: Response) -> Self {
        Self {
            path: path.to_string(),
            response,
            captured_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.captured_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew (negative ages)
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

pub struct DiskStore {
    name: String,
    dir: PathBuf,
}

impl DiskStore {
    /// Open (creating if needed) the named cache under `parent`.
    pub fn open(name: impl Into<String>, parent: &Path) -> Result<Self, StoreError> {
        let name = name.into();
        let dir = parent.join(&name);
        std::fs::create_dir_all(&dir)?;
        Ok(Self { name, dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", Self::file_stem(key)))
    }

    /// Map a request path to a filesystem-safe file stem.
    fn file_stem(key: &str) -> String {
        let stem: String = key
            .trim_start_matches('/')
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            "index".to_string()
        } else {
            stem
        }
    }

    fn load_entry(&self, path: &Path) -> Result<StoredEntry, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// All entries with their metadata, sorted by path. Used by the status
    /// report; the `CacheStore` trait exposes only the response.
    pub fn entries(&self) -> Result<Vec<StoredEntry>, StoreError> {
        let mut entries = Vec::new();
        for file in std::fs::read_dir(&self.dir)? {
            let file = file?;
            if file.path().extension().is_some_and(|ext| ext == "json") {
                entries.push(self.load_entry(&file.path())?);
            }
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

#[async_trait]
impl CacheStore for DiskStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), StoreError> {
        let entry = StoredEntry::new(request.cache_key(), response);
        let path = self.entry_path(request.cache_key());
        let contents = serde_json::to_string_pretty(&entry)?;
        std::fs::write(&path, contents)?;
        debug!(key = %request.cache_key(), file = %path.display(), "captured response");
        Ok(())
    }

    async fn lookup(&self, request: &Request) -> Result<Option<Response>, StoreError> {
        let path = self.entry_path(request.cache_key());
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(self.load_entry(&path)?.response))
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries()?.into_iter().map(|e| e.path).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn temp_store(test: &str) -> (DiskStore, PathBuf) {
        let parent = std::env::temp_dir().join(format!("noqe-sw-{}-{}", test, std::process::id()));
        let _ = std::fs::remove_dir_all(&parent);
        let store = DiskStore::open("noqe-cache-v1", &parent).unwrap();
        (store, parent)
    }

    #[test]
    fn test_file_stem_sanitizes_paths() {
        assert_eq!(DiskStore::file_stem("/"), "index");
        assert_eq!(DiskStore::file_stem("/start"), "start");
        assert_eq!(DiskStore::file_stem("/players-count"), "players-count");
        assert_eq!(DiskStore::file_stem("/a/b?c=1"), "a_b_c_1");
    }

    #[test]
    fn test_stored_entry_age_display() {
        let mut entry = StoredEntry::new("/", Response::ok(""));
        assert_eq!(entry.age_display(), "just now");

        entry.captured_at = Utc::now() - Duration::minutes(5);
        assert_eq!(entry.age_display(), "5m ago");

        entry.captured_at = Utc::now() - Duration::minutes(125);
        assert_eq!(entry.age_display(), "2h ago");

        entry.captured_at = Utc::now() - Duration::days(3);
        assert_eq!(entry.age_display(), "3d ago");
    }

    #[tokio::test]
    async fn test_put_lookup_roundtrip_on_disk() {
        let (store, parent) = temp_store("roundtrip");
        let req = Request::get("/start");
        let resp = Response::ok("<html>start</html>").with_content_type("text/html");

        store.put(&req, resp.clone()).await.unwrap();
        assert_eq!(store.lookup(&req).await.unwrap(), Some(resp));
        assert_eq!(store.keys().await.unwrap(), vec!["/start"]);

        let _ = std::fs::remove_dir_all(parent);
    }

    #[tokio::test]
    async fn test_lookup_missing_is_none() {
        let (store, parent) = temp_store("missing");
        let req = Request::get("/unknown");
        assert_eq!(store.lookup(&req).await.unwrap(), None);
        let _ = std::fs::remove_dir_all(parent);
    }
}
