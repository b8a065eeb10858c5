//! Precache worker: eager install-time caching, cache-first reads.
//!
//! At install the worker fetches every route in its manifest and captures
//! the responses into the named cache. The bulk operation is all-or-nothing:
//! one transport error or non-success status fails installation and nothing
//! is stored. At fetch time a cached response is served verbatim; a miss
//! falls back to the network and the result is returned without being
//! stored (read-only fallback, never write-back).

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info};

use crate::models::{Request, Response};
use crate::net::Fetcher;
use crate::store::CacheStore;

use super::{ServiceWorker, WorkerError};

pub struct PrecacheWorker<S: CacheStore, F: Fetcher> {
    store: S,
    fetcher: F,
    manifest: Vec<String>,
}

impl<S: CacheStore, F: Fetcher> PrecacheWorker<S, F> {
    /// A worker that precaches `manifest` into `store` at install time.
    pub fn new(store: S, fetcher: F, manifest: Vec<String>) -> Self {
        Self {
            store,
            fetcher,
            manifest,
        }
    }
}

#[async_trait]
impl<S: CacheStore, F: Fetcher> ServiceWorker for PrecacheWorker<S, F> {
    async fn install(&self) -> Result<(), WorkerError> {
        let fetches = self.manifest.iter().map(|path| async move {
            let request = Request::get(path.clone());
            let response = self.fetcher.fetch(&request).await?;
            if !response.is_success() {
                return Err(WorkerError::PrecacheStatus {
                    path: path.clone(),
                    status: response.status,
                });
            }
            Ok((request, response))
        });

        // Store only once every route has been fetched, so a failed install
        // leaves the cache untouched.
        let captured = try_join_all(fetches).await?;
        for (request, response) in captured {
            self.store.put(&request, response).await?;
        }

        info!(
            cache = self.store.name(),
            routes = self.manifest.len(),
            "precache complete"
        );
        Ok(())
    }

    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        if let Some(cached) = self.store.lookup(request).await? {
            debug!(path = %request.path, "cache hit");
            return Ok(cached);
        }
        debug!(path = %request.path, "cache miss, falling back to network");
        Ok(self.fetcher.fetch(request).await?)
    }
}
