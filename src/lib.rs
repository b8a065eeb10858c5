//! Service worker model for the noqe training planner PWA.
//!
//! The noqe app ships two alternative service-worker drafts: a pass-through
//! worker that forwards every request to the network, and a precache worker
//! that installs a fixed route manifest into a named cache and serves
//! cache-first with network fallback. Both are modeled here as policies
//! behind the [`worker::ServiceWorker`] trait, with the cache store and the
//! network as injected dependencies so the host-dictated lifecycle
//! (install, activate, fetch) can be driven by [`worker::Registration`] in
//! production and by tests alike.

pub mod config;
pub mod models;
pub mod net;
pub mod store;
pub mod worker;
