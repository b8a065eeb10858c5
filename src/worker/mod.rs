//! The service worker policies and their lifecycle.
//!
//! Two mutually exclusive policies implement the `ServiceWorker` trait:
//!
//! - `PassthroughWorker`: forwards every request to the network unchanged.
//! - `PrecacheWorker`: populates a named cache with a fixed route list at
//!   install time and serves cache-first with network fallback.
//!
//! The browser host dispatches three lifecycle events (install, activate,
//! fetch); here each is an async method returning a result, and
//! `lifecycle::Registration` plays the host, driving the events in order
//! and honoring their deferred-completion semantics.

pub mod lifecycle;
pub mod passthrough;
pub mod precache;

pub use lifecycle::{Registration, WorkerState};
pub use passthrough::PassthroughWorker;
pub use precache::PrecacheWorker;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Request, Response};
use crate::net::FetchError;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum WorkerError {
    /// A precache route answered with a non-success status, which fails
    /// installation just like a transport error.
    #[error("Precache of {path} returned status {status}")]
    PrecacheStatus { path: String, status: u16 },

    /// A lifecycle event was dispatched to a worker in the wrong state.
    #[error("Cannot dispatch {event} to a {state} worker")]
    InvalidState {
        event: &'static str,
        state: WorkerState,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A service worker: the three host-dictated lifecycle handlers.
///
/// `install` is awaited by the host (`waitUntil` semantics): an error aborts
/// installation and the worker never takes control. `fetch` is the
/// interceptor's `respondWith`: its result is what the requesting page
/// receives. A worker that defines no activate handler gets the default
/// no-op.
#[async_trait]
pub trait ServiceWorker: Send + Sync {
    async fn install(&self) -> Result<(), WorkerError>;

    async fn activate(&self) -> Result<(), WorkerError> {
        Ok(())
    }

    async fn fetch(&self, request: &Request) -> Result<Response, WorkerError>;
}
