//! In-memory cache store, used by tests as the fake the worker policies run
//! against.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::{Request, Response};

use super::{CacheStore, StoreError};

pub struct MemoryStore {
    name: String,
    entries: RwLock<HashMap<String, Response>>,
}

impl MemoryStore {
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(request.cache_key().to_string(), response);
        Ok(())
    }

    async fn lookup(&self, request: &Request) -> Result<Option<Response>, StoreError> {
        Ok(self.entries.read().await.get(request.cache_key()).cloned())
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_lookup() {
        let store = MemoryStore::open("noqe-cache-v1");
        let req = Request::get("/start");
        let resp = Response::ok("<html>start</html>");

        store.put(&req, resp.clone()).await.unwrap();
        assert_eq!(store.lookup(&req).await.unwrap(), Some(resp));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lookup_missing_is_none() {
        let store = MemoryStore::open("noqe-cache-v1");
        let req = Request::get("/unknown");
        assert_eq!(store.lookup(&req).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_capture() {
        let store = MemoryStore::open("noqe-cache-v1");
        let req = Request::get("/");
        store.put(&req, Response::ok("old")).await.unwrap();
        store.put(&req, Response::ok("new")).await.unwrap();

        let cached = store.lookup(&req).await.unwrap().unwrap();
        assert_eq!(cached.body_text(), "new");
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_sorted_paths() {
        let store = MemoryStore::open("noqe-cache-v1");
        store
            .put(&Request::get("/training"), Response::ok(""))
            .await
            .unwrap();
        store
            .put(&Request::get("/focus"), Response::ok(""))
            .await
            .unwrap();

        assert_eq!(store.keys().await.unwrap(), vec!["/focus", "/training"]);
    }
}
