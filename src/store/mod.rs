//! The named cache store shared by the install handler and the fetch
//! interceptor.
//!
//! The store is an injected dependency (the host supplies the real one), so
//! worker policies are written against the `CacheStore` trait and tests run
//! them against an in-memory fake. Stores map a request's path to the
//! response captured for it at install time. Nothing in this crate ever
//! expires, versions, or evicts an entry.

pub mod disk;
pub mod memory;

pub use disk::DiskStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Request, Response};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry corrupted: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A named cache store, safe for concurrent access by host contract.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Name the store was opened under, e.g. `"noqe-cache-v1"`.
    fn name(&self) -> &str;

    /// Capture a response for a request. Overwrites any previous capture.
    async fn put(&self, request: &Request, response: Response) -> Result<(), StoreError>;

    /// Look up the captured response for a request, if any.
    async fn lookup(&self, request: &Request) -> Result<Option<Response>, StoreError>;

    /// Paths of all captured entries.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.keys().await?.len())
    }
}

#[async_trait]
impl<S: CacheStore + ?Sized> CacheStore for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn put(&self, request: &Request, response: Response) -> Result<(), StoreError> {
        (**self).put(request, response).await
    }

    async fn lookup(&self, request: &Request) -> Result<Option<Response>, StoreError> {
        (**self).lookup(request).await
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        (**self).keys().await
    }

    async fn len(&self) -> Result<usize, StoreError> {
        (**self).len().await
    }
}
