//! Host-side lifecycle for a registered worker.
//!
//! The browser owns the ordering of install, activate, and fetch; this
//! module plays that role. `Registration` dispatches each event to its
//! worker and tracks the state machine: a failed install makes the worker
//! redundant, and only an activated worker intercepts fetches.

use std::fmt;

use tracing::{debug, info, warn};

use crate::models::{Request, Response};

use super::{ServiceWorker, WorkerError};

/// Service worker lifecycle states, per the W3C model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Registered, install event not yet dispatched.
    Installing,
    /// Install completed, not yet in control of pages.
    Installed,
    /// Activate event dispatched.
    Activating,
    /// In control: fetch events are intercepted.
    Activated,
    /// Install or activate failed; the worker will never take control.
    Redundant,
}

impl WorkerState {
    pub fn can_intercept_fetch(&self) -> bool {
        matches!(self, WorkerState::Activated)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(s)
    }
}

/// A registered worker plus its lifecycle state. Stands in for the browser
/// in the binary and in tests.
pub struct Registration<W: ServiceWorker> {
    worker: W,
    state: WorkerState,
}

impl<W: ServiceWorker> Registration<W> {
    pub fn new(worker: W) -> Self {
        Self {
            worker,
            state: WorkerState::Installing,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Dispatch the install event and await its completion (`waitUntil`).
    /// On failure the worker becomes redundant.
    pub async fn install(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installing {
            return Err(WorkerError::InvalidState {
                event: "install",
                state: self.state,
            });
        }
        debug!("dispatching install event");
        match self.worker.install().await {
            Ok(()) => {
                self.state = WorkerState::Installed;
                info!("worker installed");
                Ok(())
            }
            Err(err) => {
                self.state = WorkerState::Redundant;
                warn!(error = %err, "install failed, worker is redundant");
                Err(err)
            }
        }
    }

    /// Dispatch the activate event; the worker takes control of pages.
    pub async fn activate(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installed {
            return Err(WorkerError::InvalidState {
                event: "activate",
                state: self.state,
            });
        }
        self.state = WorkerState::Activating;
        debug!("dispatching activate event");
        match self.worker.activate().await {
            Ok(()) => {
                self.state = WorkerState::Activated;
                info!("worker activated");
                Ok(())
            }
            Err(err) => {
                self.state = WorkerState::Redundant;
                warn!(error = %err, "activate failed, worker is redundant");
                Err(err)
            }
        }
    }

    /// Dispatch a fetch event to the worker (`respondWith`). Only an
    /// activated worker intercepts requests.
    pub async fn handle_fetch(&self, request: &Request) -> Result<Response, WorkerError> {
        if !self.state.can_intercept_fetch() {
            return Err(WorkerError::InvalidState {
                event: "fetch",
                state: self.state,
            });
        }
        self.worker.fetch(request).await
    }

    /// Run install then activate, the order the host guarantees.
    pub async fn take_control(&mut self) -> Result<(), WorkerError> {
        self.install().await?;
        self.activate().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testing::FakeFetcher;
    use super::*;
    use crate::config::{DEFAULT_CACHE_NAME, DEFAULT_PRECACHE_ROUTES};
    use crate::store::{CacheStore, MemoryStore};
    use crate::worker::{PassthroughWorker, PrecacheWorker};

    fn routes() -> Vec<String> {
        DEFAULT_PRECACHE_ROUTES.iter().map(|r| r.to_string()).collect()
    }

    fn fetcher_serving_all_routes() -> FakeFetcher {
        DEFAULT_PRECACHE_ROUTES
            .iter()
            .fold(FakeFetcher::new(), |f, route| f.serve(route))
    }

    #[tokio::test]
    async fn test_full_lifecycle_end_to_end() {
        let store = Arc::new(MemoryStore::open(DEFAULT_CACHE_NAME));
        let fetcher = Arc::new(fetcher_serving_all_routes());
        let worker = PrecacheWorker::new(store.clone(), fetcher.clone(), routes());
        let mut registration = Registration::new(worker);

        assert_eq!(registration.state(), WorkerState::Installing);

        registration.install().await.unwrap();
        assert_eq!(registration.state(), WorkerState::Installed);
        assert_eq!(store.len().await.unwrap(), 7);

        registration.activate().await.unwrap();
        assert_eq!(registration.state(), WorkerState::Activated);

        // Precached route served from cache, without another network call
        let calls_after_install = fetcher.call_count();
        let response = registration
            .handle_fetch(&Request::get("/start"))
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(fetcher.call_count(), calls_after_install);
    }

    #[tokio::test]
    async fn test_failed_install_makes_worker_redundant() {
        let store = Arc::new(MemoryStore::open(DEFAULT_CACHE_NAME));
        let fetcher = Arc::new(fetcher_serving_all_routes().unreachable("/physical"));
        let worker = PrecacheWorker::new(store.clone(), fetcher, routes());
        let mut registration = Registration::new(worker);

        assert!(registration.install().await.is_err());
        assert_eq!(registration.state(), WorkerState::Redundant);

        // A redundant worker never activates or intercepts
        assert!(matches!(
            registration.activate().await,
            Err(WorkerError::InvalidState { event: "activate", .. })
        ));
        assert!(matches!(
            registration.handle_fetch(&Request::get("/")).await,
            Err(WorkerError::InvalidState { event: "fetch", .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_before_activation_is_refused() {
        let fetcher = Arc::new(FakeFetcher::new().serve("/"));
        let worker = PassthroughWorker::new(fetcher.clone());
        let mut registration = Registration::new(worker);

        assert!(registration.handle_fetch(&Request::get("/")).await.is_err());

        registration.install().await.unwrap();
        assert!(registration.handle_fetch(&Request::get("/")).await.is_err());
        assert_eq!(fetcher.call_count(), 0);

        registration.activate().await.unwrap();
        registration.handle_fetch(&Request::get("/")).await.unwrap();
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_activate_does_not_alter_cache_contents() {
        let store = Arc::new(MemoryStore::open(DEFAULT_CACHE_NAME));
        let fetcher = Arc::new(fetcher_serving_all_routes());
        let worker = PrecacheWorker::new(store.clone(), fetcher, routes());
        let mut registration = Registration::new(worker);

        registration.install().await.unwrap();
        let keys_before = store.keys().await.unwrap();

        registration.activate().await.unwrap();
        assert_eq!(store.keys().await.unwrap(), keys_before);
    }

    #[tokio::test]
    async fn test_install_cannot_run_twice() {
        let fetcher = Arc::new(FakeFetcher::new());
        let worker = PassthroughWorker::new(fetcher);
        let mut registration = Registration::new(worker);

        registration.install().await.unwrap();
        assert!(matches!(
            registration.install().await,
            Err(WorkerError::InvalidState { event: "install", .. })
        ));
    }
}
