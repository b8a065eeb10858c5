//! Network access for the service worker.
//!
//! The network is an injected dependency: worker policies talk to a
//! `Fetcher` rather than a concrete HTTP client, so tests can substitute a
//! fake network and count the calls a policy makes.

pub mod error;
pub mod http;

pub use error::FetchError;
pub use http::HttpFetcher;

use async_trait::async_trait;

use crate::models::{Request, Response};

/// The network as the worker sees it.
///
/// A completed HTTP exchange is `Ok` whatever its status code; only
/// transport-level failures (unreachable host, timeout) are errors. Status
/// policy belongs to the caller: the precache installer rejects non-success
/// statuses, the fetch interceptor passes them through unchanged.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        (**self).fetch(request).await
    }
}
