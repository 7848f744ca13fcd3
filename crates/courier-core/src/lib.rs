pub mod backend;
pub mod error;
pub mod routing;
pub mod session;

// Re-export common error type
pub use error::{CourierError, Result};
