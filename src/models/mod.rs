//! Request and response models shared by the network layer, the cache
//! store, and the worker policies.
//!
//! Responses are serializable so captured copies can be persisted by the
//! disk-backed cache store.

pub mod request;
pub mod response;

pub use request::{Method, Request};
pub use response::Response;
