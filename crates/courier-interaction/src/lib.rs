//! HTTP client layer for the Courier backend.
//!
//! Implements the `courier-core` backend traits over reqwest against the
//! fixed endpoint surface the backend exposes.

pub mod config;
pub mod http_backend;

pub use config::BackendConfig;
pub use http_backend::HttpBackend;
