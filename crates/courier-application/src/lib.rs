//! Application layer for Courier.
//!
//! Hosts the request lifecycle controller that ties the domain model,
//! the intent router, and the backend client together.

pub mod chat_usecase;

pub use chat_usecase::{ChatUseCase, SEND_FAILURE_MESSAGE};
