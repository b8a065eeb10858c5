//! Pass-through worker: every request goes to the network unchanged.
//!
//! Install and activate only log; there is no cache at all. Offline, an
//! uncached request fails with whatever error the network produces.

use async_trait::async_trait;
use tracing::info;

use crate::models::{Request, Response};
use crate::net::Fetcher;

use super::{ServiceWorker, WorkerError};

pub struct PassthroughWorker<F: Fetcher> {
    fetcher: F,
}

impl<F: Fetcher> PassthroughWorker<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl<F: Fetcher> ServiceWorker for PassthroughWorker<F> {
    async fn install(&self) -> Result<(), WorkerError> {
        info!("service worker installed");
        Ok(())
    }

    async fn activate(&self) -> Result<(), WorkerError> {
        info!("service worker activated");
        Ok(())
    }

    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        Ok(self.fetcher.fetch(request).await?)
    }
}
